//! Response types for the GPA engine API.
//!
//! This module defines the report bodies returned by each endpoint, the
//! error response structure, and the mapping from engine errors to HTTP
//! statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::access::{ChangeDecision, UsageSnapshot};
use crate::calculation::{
    ExclusionReason, RankedStudent, SemesterGroup, classify_exclusion, normalize_semester,
};
use crate::config::GradingPolicy;
use crate::error::EngineError;
use crate::models::{GpaResult, GradeRecord, SemesterKey, Student};

/// Identifying details of a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    /// Student number.
    pub id: String,
    /// Full name.
    pub full_name: String,
    /// Date of birth, when it could be parsed.
    pub date_of_birth: Option<NaiveDate>,
    /// Place of birth.
    pub place_of_birth: Option<String>,
    /// Class code.
    pub class_code: String,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            full_name: student.full_name.clone(),
            date_of_birth: student.date_of_birth,
            place_of_birth: student.place_of_birth.clone(),
            class_code: student.class_code.clone(),
        }
    }
}

/// A transcript row annotated with how the engine treated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    /// The row as received.
    #[serde(flatten)]
    pub record: GradeRecord,
    /// Bucket the row is grouped under.
    pub semester_key: SemesterKey,
    /// True if the row is kept out of GPA.
    pub excluded: bool,
    /// Why the row is kept out of GPA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_reason: Option<ExclusionReason>,
}

impl RecordRow {
    /// Annotates a record under `policy`.
    pub fn new(record: &GradeRecord, policy: &GradingPolicy) -> Self {
        let exclusion_reason = classify_exclusion(record, policy);
        Self {
            record: record.clone(),
            semester_key: normalize_semester(record, policy),
            excluded: exclusion_reason.is_some(),
            exclusion_reason,
        }
    }
}

/// One semester of the transcript view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterGroupReport {
    /// Bucket key.
    pub key: SemesterKey,
    /// GPA of the bucket.
    pub gpa: GpaResult,
    /// Display rows.
    pub records: Vec<RecordRow>,
}

impl SemesterGroupReport {
    /// Builds the report of one semester group.
    pub fn new(group: &SemesterGroup<'_>, policy: &GradingPolicy) -> Self {
        Self {
            key: group.key.clone(),
            gpa: group.gpa.clone(),
            records: group
                .records
                .iter()
                .map(|record| RecordRow::new(record, policy))
                .collect(),
        }
    }
}

/// GPA of the semester selected in the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedSemester {
    /// The filter as given.
    pub key: String,
    /// GPA of the matching bucket.
    pub gpa: GpaResult,
}

/// Response body of the `/gpa` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpaReport {
    /// The student.
    pub student: StudentSummary,
    /// GPA over the whole transcript.
    pub cumulative: GpaResult,
    /// GPA of the requested semester.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<SelectedSemester>,
    /// Semester groups, most recent first.
    pub groups: Vec<SemesterGroupReport>,
    /// Every semester key on the transcript, most recent first.
    pub semesters: Vec<SemesterKey>,
}

/// One row of the `/roster/rank` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    /// 1-based position.
    pub rank: usize,
    /// Student number.
    pub id: String,
    /// Full name.
    pub full_name: String,
    /// Class code.
    pub class_code: String,
    /// GPA over the whole transcript.
    pub cumulative: GpaResult,
    /// GPA of the selected semester.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<GpaResult>,
    /// Ranking GPA formatted for display, or "N/A".
    pub display: String,
}

impl From<RankedStudent<'_>> for RosterRow {
    fn from(ranked: RankedStudent<'_>) -> Self {
        Self {
            rank: ranked.rank,
            id: ranked.student.id.clone(),
            full_name: ranked.student.full_name.clone(),
            class_code: ranked.student.class_code.clone(),
            cumulative: ranked.cumulative,
            semester: ranked.semester,
            display: ranked.display,
        }
    }
}

/// Response body of the `/roster/rank` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterReport {
    /// Ranked students.
    pub rows: Vec<RosterRow>,
    /// Semester keys across the whole roster, for the filter.
    pub semesters: Vec<SemesterKey>,
}

/// Response body of the `/class-selection` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSelectionResponse {
    /// The account.
    pub user_id: String,
    /// What happened.
    #[serde(flatten)]
    pub decision: ChangeDecision,
    /// Allowance state after the request.
    pub usage: Option<UsageSnapshot>,
}

/// Response body of the `/class-selection/{user_id}/reset` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetResponse {
    /// Confirmation text.
    pub message: String,
    /// The account.
    pub user_id: String,
    /// Allowance state after the reset.
    pub usage: UsageSnapshot,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a missing field error response.
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::with_details(
            "MISSING_FIELD",
            format!("missing field: {}", field),
            format!("Required field '{}' was not provided in the request", field),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidPolicy { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Invalid grading policy", message),
            },
            EngineError::MissingRecords { student_id } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "MISSING_RECORDS",
                    format!("Student '{}' has no grade records", student_id),
                    "The 'diem' field must be present and must be a list",
                ),
            },
            EngineError::InvalidSimulatedCourse { index, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_SIMULATED_COURSE",
                    format!("Invalid simulated course at index {}", index),
                    message,
                ),
            },
            EngineError::SimulationOverflow { message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    "Simulation totals out of range",
                    message,
                ),
            },
        }
    }
}
