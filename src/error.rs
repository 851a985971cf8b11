//! Error types for the GPA engine.
//!
//! Malformed grade data never surfaces here: unparsable scores, missing
//! credits and empty labels degrade to excluded or zero paths inside the
//! calculation module. This enum covers the failures that callers must
//! handle explicitly.

use thiserror::Error;

/// The main error type for the GPA engine.
///
/// # Example
///
/// ```
/// use gpa_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/exclusions.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/exclusions.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The configuration parsed but describes an unusable grading policy.
    #[error("Invalid grading policy: {message}")]
    InvalidPolicy {
        /// What was wrong with the policy.
        message: String,
    },

    /// A student was supplied without any grade records collection.
    #[error("Student '{student_id}' has no grade records collection")]
    MissingRecords {
        /// The student whose records were absent.
        student_id: String,
    },

    /// A hypothetical course passed to the simulator was invalid.
    #[error("Invalid simulated course at index {index}: {message}")]
    InvalidSimulatedCourse {
        /// Position of the course in the request.
        index: usize,
        /// A description of what made the course invalid.
        message: String,
    },

    /// The simulation totals fall outside the representable decimal range.
    #[error("Simulation out of range: {message}")]
    SimulationOverflow {
        /// Which figure could not be computed.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
