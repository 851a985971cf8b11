//! HTTP request handlers for the GPA engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::ChangeDecision;
use crate::calculation::{
    collect_semesters, compute_cumulative_gpa, compute_semester_gpa, group_by_semester,
    rank_roster, simulate_gpa,
};
use crate::error::EngineError;
use crate::models::Student;

use super::request::{ClassSelectionRequest, GpaRequest, RosterRequest, SimulateRequest};
use super::response::{
    ApiError, ApiErrorResponse, ClassSelectionResponse, GpaReport, ResetResponse, RosterReport,
    RosterRow, SelectedSemester, SemesterGroupReport, StudentSummary,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/gpa", post(gpa_handler))
        .route("/roster/rank", post(roster_handler))
        .route("/simulate", post(simulate_handler))
        .route("/class-selection", post(class_selection_handler))
        .route("/class-selection/:user_id/reset", post(reset_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Maps a body extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for POST /gpa.
///
/// Returns the cumulative GPA, the optional semester GPA and the grouped
/// transcript of one student.
async fn gpa_handler(
    State(state): State<AppState>,
    payload: Result<Json<GpaRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing GPA request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let student = match Student::try_from(request.student) {
        Ok(student) => student,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let policy = state.config().policy();

    let cumulative = compute_cumulative_gpa(&student, policy);
    let semester = request
        .semester
        .filter(|key| !key.trim().is_empty())
        .map(|key| SelectedSemester {
            gpa: compute_semester_gpa(&student, &key, policy),
            key,
        });
    let groups: Vec<SemesterGroupReport> = group_by_semester(&student, policy)
        .iter()
        .map(|group| SemesterGroupReport::new(group, policy))
        .collect();
    let semesters = collect_semesters(std::slice::from_ref(&student), policy);

    info!(
        correlation_id = %correlation_id,
        student_id = %student.id,
        records_count = student.records.len(),
        groups_count = groups.len(),
        gpa4 = %cumulative.gpa4,
        duration_us = start_time.elapsed().as_micros(),
        "GPA computed successfully"
    );

    let report = GpaReport {
        student: StudentSummary::from(&student),
        cumulative,
        semester,
        groups,
        semesters,
    };
    json_response(StatusCode::OK, report)
}

/// Handler for POST /roster/rank.
///
/// Ranks a roster by cumulative or semester GPA.
async fn roster_handler(
    State(state): State<AppState>,
    payload: Result<Json<RosterRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing roster ranking request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let (students, query) = match request.into_parts() {
        Ok(parts) => parts,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let policy = state.config().policy();

    let rows: Vec<RosterRow> = rank_roster(&students, &query, policy)
        .into_iter()
        .map(RosterRow::from)
        .collect();
    let semesters = collect_semesters(&students, policy);

    info!(
        correlation_id = %correlation_id,
        students_count = students.len(),
        ranked_count = rows.len(),
        semester = query.semester_filter().unwrap_or(""),
        duration_us = start_time.elapsed().as_micros(),
        "Roster ranked successfully"
    );

    json_response(StatusCode::OK, RosterReport { rows, semesters })
}

/// Handler for POST /simulate.
///
/// Projects the 4-point GPA after hypothetical courses.
async fn simulate_handler(payload: Result<Json<SimulateRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing simulation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if let Err(message) = request.validate() {
        warn!(
            correlation_id = %correlation_id,
            error = %message,
            "Simulation request rejected"
        );
        return json_response(StatusCode::BAD_REQUEST, ApiError::validation_error(message));
    }

    match simulate_gpa(&request.base(), &request.courses) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                courses_count = request.courses.len(),
                additional_credits = %result.additional_credits,
                "Simulation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /class-selection.
///
/// Switches a user's followed class, subject to the daily allowance.
async fn class_selection_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClassSelectionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing class selection request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return json_response(StatusCode::BAD_REQUEST, ApiError::missing_field("user_id"));
    }
    if request.class_code.trim().is_empty() {
        return json_response(StatusCode::BAD_REQUEST, ApiError::missing_field("class_code"));
    }

    let limiter = state.limiter();
    let decision = limiter.request_change(user_id, request.role, &request.class_code);

    if decision == ChangeDecision::LimitReached {
        warn!(
            correlation_id = %correlation_id,
            user_id = %user_id,
            "Class change limit reached"
        );
    } else {
        info!(
            correlation_id = %correlation_id,
            user_id = %user_id,
            class_code = %request.class_code.trim(),
            decision = ?decision,
            "Class selection processed"
        );
    }

    json_response(
        StatusCode::OK,
        ClassSelectionResponse {
            user_id: user_id.to_string(),
            decision,
            usage: limiter.usage(user_id),
        },
    )
}

/// Handler for POST /class-selection/{user_id}/reset.
///
/// Clears a user's class-change count for the current day.
async fn reset_handler(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();

    let usage = state.limiter().reset(&user_id);
    info!(
        correlation_id = %correlation_id,
        user_id = %user_id,
        "Class change limit reset"
    );

    json_response(
        StatusCode::OK,
        ResetResponse {
            message: format!("Limit reset for user {}", user_id),
            user_id,
            usage,
        },
    )
}
