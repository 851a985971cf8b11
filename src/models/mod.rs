//! Core data models for the GPA engine.
//!
//! Grade records and students are read-only snapshots handed over by the
//! data provider; GPA results are recomputed from them on every request.

mod gpa_result;
mod grade_record;
mod semester_key;
mod student;

pub use gpa_result::{GpaResult, GradeScale};
pub use grade_record::{ComponentScores, GradeRecord, RawScore};
pub use semester_key::SemesterKey;
pub use student::Student;
