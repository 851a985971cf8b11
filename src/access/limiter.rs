//! Daily class-change allowance for regular users.
//!
//! Regular users may switch their followed class a fixed number of times
//! per UTC day. Admins are never limited, and an admin can clear a user's
//! count for the rest of the day.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clock::Clock;

/// Who is asking for a change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A regular user, subject to the daily limit.
    #[default]
    User,
    /// An administrator, never limited.
    Admin,
}

/// Outcome of a change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ChangeDecision {
    /// The class was switched.
    Allowed {
        /// Changes left today; `None` for unlimited users.
        remaining: Option<u32>,
    },
    /// The requested class is already selected; nothing was used up.
    Unchanged,
    /// No changes are left today.
    LimitReached,
}

/// A user's current allowance state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// UTC day the count applies to.
    pub date: NaiveDate,
    /// Changes made on `date`.
    pub count: u32,
    /// Currently selected class.
    pub selected_class: Option<String>,
    /// Last time an admin cleared the count.
    pub reset_at: Option<DateTime<Utc>>,
}

impl UsageSnapshot {
    fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            selected_class: None,
            reset_at: None,
        }
    }
}

/// Tracks class changes per user id.
pub struct ClassChangeLimiter {
    max_changes_per_day: u32,
    clock: Arc<dyn Clock>,
    usage: Mutex<HashMap<String, UsageSnapshot>>,
}

impl std::fmt::Debug for ClassChangeLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassChangeLimiter")
            .field("max_changes_per_day", &self.max_changes_per_day)
            .finish_non_exhaustive()
    }
}

impl ClassChangeLimiter {
    /// Creates a limiter allowing `max_changes_per_day` changes per user.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use gpa_engine::access::{ChangeDecision, ClassChangeLimiter, Role, SystemClock};
    ///
    /// let limiter = ClassChangeLimiter::new(3, Arc::new(SystemClock));
    /// assert_eq!(
    ///     limiter.request_change("u1", Role::User, "DHMT16A1HN"),
    ///     ChangeDecision::Allowed { remaining: Some(2) }
    /// );
    /// assert_eq!(
    ///     limiter.request_change("u1", Role::User, "DHMT16A1HN"),
    ///     ChangeDecision::Unchanged
    /// );
    /// ```
    pub fn new(max_changes_per_day: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_changes_per_day,
            clock,
            usage: Mutex::new(HashMap::new()),
        }
    }

    /// The configured daily allowance.
    pub fn max_changes_per_day(&self) -> u32 {
        self.max_changes_per_day
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, UsageSnapshot>> {
        self.usage.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Asks to switch `user_id` to `requested_class`.
    pub fn request_change(&self, user_id: &str, role: Role, requested_class: &str) -> ChangeDecision {
        let today = self.clock.now().date_naive();
        let requested_class = requested_class.trim();

        let mut usage = self.lock();
        let entry = usage
            .entry(user_id.to_string())
            .or_insert_with(|| UsageSnapshot::fresh(today));

        if entry.date != today {
            entry.date = today;
            entry.count = 0;
        }

        if role == Role::Admin {
            entry.selected_class = Some(requested_class.to_string());
            return ChangeDecision::Allowed { remaining: None };
        }

        if entry.selected_class.as_deref() == Some(requested_class) {
            return ChangeDecision::Unchanged;
        }

        if entry.count >= self.max_changes_per_day {
            debug!(user_id = %user_id, count = entry.count, "Class change limit reached");
            return ChangeDecision::LimitReached;
        }

        entry.count += 1;
        entry.selected_class = Some(requested_class.to_string());
        ChangeDecision::Allowed {
            remaining: Some(self.max_changes_per_day - entry.count),
        }
    }

    /// Clears today's count for `user_id` and records when that happened.
    pub fn reset(&self, user_id: &str) -> UsageSnapshot {
        let now = self.clock.now();
        let today = now.date_naive();

        let mut usage = self.lock();
        let entry = usage
            .entry(user_id.to_string())
            .or_insert_with(|| UsageSnapshot::fresh(today));
        entry.date = today;
        entry.count = 0;
        entry.reset_at = Some(now);
        entry.clone()
    }

    /// Returns the allowance state of `user_id`, if it has one.
    ///
    /// A count recorded on an earlier day is reported as zero.
    pub fn usage(&self, user_id: &str) -> Option<UsageSnapshot> {
        let today = self.clock.now().date_naive();
        self.lock().get(user_id).map(|entry| {
            let mut snapshot = entry.clone();
            if snapshot.date != today {
                snapshot.date = today;
                snapshot.count = 0;
            }
            snapshot
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::FixedClock;
    use chrono::{Duration, TimeZone};

    fn create_test_limiter() -> (ClassChangeLimiter, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap(),
        ));
        (ClassChangeLimiter::new(3, clock.clone()), clock)
    }

    #[test]
    fn test_user_gets_three_changes_then_limit() {
        let (limiter, _) = create_test_limiter();

        assert_eq!(
            limiter.request_change("u1", Role::User, "A"),
            ChangeDecision::Allowed { remaining: Some(2) }
        );
        assert_eq!(
            limiter.request_change("u1", Role::User, "B"),
            ChangeDecision::Allowed { remaining: Some(1) }
        );
        assert_eq!(
            limiter.request_change("u1", Role::User, "C"),
            ChangeDecision::Allowed { remaining: Some(0) }
        );
        assert_eq!(
            limiter.request_change("u1", Role::User, "D"),
            ChangeDecision::LimitReached
        );

        let usage = limiter.usage("u1").unwrap();
        assert_eq!(usage.count, 3);
        assert_eq!(usage.selected_class.as_deref(), Some("C"));
    }

    #[test]
    fn test_reselecting_current_class_is_free() {
        let (limiter, _) = create_test_limiter();

        limiter.request_change("u1", Role::User, "A");
        assert_eq!(
            limiter.request_change("u1", Role::User, " A "),
            ChangeDecision::Unchanged
        );
        assert_eq!(limiter.usage("u1").unwrap().count, 1);
    }

    #[test]
    fn test_current_class_stays_selectable_after_limit() {
        let (limiter, _) = create_test_limiter();
        for class in ["A", "B", "C"] {
            limiter.request_change("u1", Role::User, class);
        }

        assert_eq!(
            limiter.request_change("u1", Role::User, "C"),
            ChangeDecision::Unchanged
        );
    }

    #[test]
    fn test_count_resets_on_utc_date_change() {
        let (limiter, clock) = create_test_limiter();
        for class in ["A", "B", "C"] {
            limiter.request_change("u1", Role::User, class);
        }
        assert_eq!(
            limiter.request_change("u1", Role::User, "D"),
            ChangeDecision::LimitReached
        );

        clock.advance(Duration::hours(16));
        assert_eq!(limiter.usage("u1").unwrap().count, 0);
        assert_eq!(
            limiter.request_change("u1", Role::User, "D"),
            ChangeDecision::Allowed { remaining: Some(2) }
        );
    }

    #[test]
    fn test_same_day_does_not_reset() {
        let (limiter, clock) = create_test_limiter();
        for class in ["A", "B", "C"] {
            limiter.request_change("u1", Role::User, class);
        }

        clock.advance(Duration::hours(15));
        assert_eq!(
            limiter.request_change("u1", Role::User, "D"),
            ChangeDecision::LimitReached
        );
    }

    #[test]
    fn test_admin_is_unlimited() {
        let (limiter, _) = create_test_limiter();
        for class in ["A", "B", "C", "D", "E"] {
            assert_eq!(
                limiter.request_change("admin", Role::Admin, class),
                ChangeDecision::Allowed { remaining: None }
            );
        }

        let usage = limiter.usage("admin").unwrap();
        assert_eq!(usage.count, 0);
        assert_eq!(usage.selected_class.as_deref(), Some("E"));
    }

    #[test]
    fn test_reset_clears_count_and_records_time() {
        let (limiter, clock) = create_test_limiter();
        for class in ["A", "B", "C"] {
            limiter.request_change("u1", Role::User, class);
        }

        let snapshot = limiter.reset("u1");
        assert_eq!(snapshot.count, 0);
        assert_eq!(snapshot.reset_at, Some(clock.now()));
        assert_eq!(snapshot.selected_class.as_deref(), Some("C"));

        assert_eq!(
            limiter.request_change("u1", Role::User, "D"),
            ChangeDecision::Allowed { remaining: Some(2) }
        );
    }

    #[test]
    fn test_reset_of_unknown_user_creates_entry() {
        let (limiter, _) = create_test_limiter();
        assert!(limiter.usage("ghost").is_none());

        let snapshot = limiter.reset("ghost");
        assert_eq!(snapshot.count, 0);
        assert!(limiter.usage("ghost").is_some());
    }

    #[test]
    fn test_users_are_tracked_independently() {
        let (limiter, _) = create_test_limiter();
        for class in ["A", "B", "C"] {
            limiter.request_change("u1", Role::User, class);
        }

        assert_eq!(
            limiter.request_change("u2", Role::User, "A"),
            ChangeDecision::Allowed { remaining: Some(2) }
        );
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(ChangeDecision::Allowed { remaining: Some(2) }).unwrap();
        assert_eq!(json["decision"], "allowed");
        assert_eq!(json["remaining"], 2);

        let json = serde_json::to_value(ChangeDecision::LimitReached).unwrap();
        assert_eq!(json["decision"], "limit_reached");

        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
