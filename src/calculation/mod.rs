//! Calculation logic for the GPA engine.
//!
//! This module contains the pure functions that turn raw transcript rows
//! into GPA figures: score parsing and scale derivation, GPA eligibility
//! classification, semester normalization and ordering, credit-weighted
//! aggregation with retake deduplication, semester grouping, roster
//! ranking and the what-if simulator.

mod aggregate;
mod classifier;
mod grouping;
mod ordering;
mod roster;
mod score;
mod semester;
mod simulator;
mod text;

pub use aggregate::{
    GPA_DECIMAL_PLACES, aggregate, compute_cumulative_gpa, compute_semester_gpa, dedup_key,
    round_gpa,
};
pub use classifier::{ExclusionReason, classify_exclusion, is_excluded_from_gpa};
pub use grouping::{SemesterGroup, collect_semesters, group_by_semester};
pub use ordering::{
    SUPPLEMENTARY_TERM, SemesterOrdinal, compare_semesters, parse_semester_label, sort_semesters,
};
pub use roster::{RankedStudent, RosterQuery, rank_roster};
pub use score::{CleanedScore, SCALE_4_MAX, SCALE_10_MAX, clean_score, parse_score};
pub use semester::{is_advanced_study, normalize_semester};
pub use simulator::{SimulatedCourse, SimulationResult, simulate_gpa};
pub use text::fold_diacritics;
