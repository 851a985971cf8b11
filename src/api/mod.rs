//! HTTP API module for the GPA engine.
//!
//! This module provides the REST API endpoints for transcript GPA reports,
//! roster ranking, GPA simulation and class selection.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ClassSelectionRequest, GpaRequest, GradeRequest, RosterRequest, SimulateRequest,
    StudentRequest,
};
pub use response::{
    ApiError, ClassSelectionResponse, GpaReport, RecordRow, ResetResponse, RosterReport,
    RosterRow, SelectedSemester, SemesterGroupReport, StudentSummary,
};
pub use state::AppState;
