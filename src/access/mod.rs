//! Per-user class-change allowance.
//!
//! The limiter takes its notion of "today" from an injected [`Clock`], so
//! tests and embedding services control when the daily count rolls over.

mod clock;
mod limiter;

pub use clock::{Clock, FixedClock, SystemClock};
pub use limiter::{ChangeDecision, ClassChangeLimiter, Role, UsageSnapshot};
