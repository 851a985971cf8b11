//! Application state for the GPA engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::access::{ClassChangeLimiter, Clock, SystemClock};
use crate::config::ConfigLoader;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded grading policy and the class-change limiter.
#[derive(Clone)]
pub struct AppState {
    /// The loaded grading policy.
    config: Arc<ConfigLoader>,
    /// Per-user class-change allowance.
    limiter: Arc<ClassChangeLimiter>,
}

impl AppState {
    /// Creates a new application state using the wall clock.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a new application state with an explicit clock.
    ///
    /// The limiter's daily allowance is taken from the loaded policy.
    pub fn with_clock(config: ConfigLoader, clock: Arc<dyn Clock>) -> Self {
        let limiter = ClassChangeLimiter::new(config.policy().class_change_limit(), clock);
        Self {
            config: Arc::new(config),
            limiter: Arc::new(limiter),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the class-change limiter.
    pub fn limiter(&self) -> &ClassChangeLimiter {
        &self.limiter
    }
}
