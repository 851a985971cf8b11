//! Student model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::GradeRecord;

/// A student and a read-only snapshot of their transcript.
///
/// Record order is only significant for retakes: when two records share a
/// course, the later one supersedes the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Student number.
    pub id: String,
    /// Full name.
    pub full_name: String,
    /// Date of birth, when the provider supplied a parseable one.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Place of birth.
    #[serde(default)]
    pub place_of_birth: Option<String>,
    /// Administrative class code (e.g. "DHMT16A1HN").
    #[serde(default)]
    pub class_code: String,
    /// Transcript rows.
    #[serde(default)]
    pub records: Vec<GradeRecord>,
}

impl Student {
    /// Returns true if the id or full name contains `term`, ignoring case.
    ///
    /// An empty term matches every student.
    ///
    /// # Examples
    ///
    /// ```
    /// use gpa_engine::models::Student;
    ///
    /// let student = Student {
    ///     id: "2251010001".to_string(),
    ///     full_name: "Nguyễn Văn An".to_string(),
    ///     ..Student::default()
    /// };
    /// assert!(student.matches_search("văn an"));
    /// assert!(student.matches_search("225101"));
    /// assert!(!student.matches_search("Bình"));
    /// ```
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.full_name.to_lowercase().contains(&term) || self.id.to_lowercase().contains(&term)
    }
}
