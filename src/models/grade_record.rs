//! Grade record model and related types.
//!
//! A [`GradeRecord`] is one row of a student's transcript: a single attempt
//! at a single course. Numeric fields arrive from the upstream provider as
//! either JSON numbers or free text, so they are kept as [`RawScore`] and
//! only interpreted by the score cleaner.

use serde::{Deserialize, Serialize};

/// An uninterpreted numeric value as delivered by the grade provider.
///
/// # Example
///
/// ```
/// use gpa_engine::models::RawScore;
///
/// let text: RawScore = serde_json::from_str("\"8,5\"").unwrap();
/// assert_eq!(text, RawScore::Text("8,5".to_string()));
///
/// let number: RawScore = serde_json::from_str("8.5").unwrap();
/// assert_eq!(number, RawScore::Number(8.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
    /// A JSON number.
    Number(f64),
    /// A textual value, possibly with a comma decimal separator.
    Text(String),
}

impl From<f64> for RawScore {
    fn from(value: f64) -> Self {
        RawScore::Number(value)
    }
}

impl From<i32> for RawScore {
    fn from(value: i32) -> Self {
        RawScore::Number(f64::from(value))
    }
}

impl From<&str> for RawScore {
    fn from(value: &str) -> Self {
        RawScore::Text(value.to_string())
    }
}

impl From<String> for RawScore {
    fn from(value: String) -> Self {
        RawScore::Text(value)
    }
}

/// Component sub-scores shown in the detail view.
///
/// None of these take part in GPA aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    /// Attendance score.
    pub attendance: Option<String>,
    /// Coefficient-1 assessments, attempts 1 to 4.
    pub coefficient_1: [Option<String>; 4],
    /// Coefficient-2 assessments, attempts 1 to 4.
    pub coefficient_2: [Option<String>; 4],
    /// Practical assessment 1.
    pub practical_1: Option<String>,
    /// Practical assessment 2.
    pub practical_2: Option<String>,
    /// Average of the regular assessments.
    pub regular_average: Option<String>,
    /// Whether the student qualified for the final exam.
    pub exam_eligibility: Option<String>,
    /// Final exam score.
    pub exam_score: Option<String>,
    /// Upstream semester average on the 10-point scale.
    pub semester_average_10: Option<String>,
    /// Upstream semester average on the 4-point scale.
    pub semester_average_4: Option<String>,
    /// Upstream cumulative average on the 10-point scale.
    pub cumulative_average_10: Option<String>,
    /// Upstream cumulative average on the 4-point scale.
    pub cumulative_average_4: Option<String>,
}

/// One course attempt on a student's transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    /// Course code, empty when the provider did not supply one.
    #[serde(default)]
    pub course_code: String,
    /// Course name. Empty names mark summary rows.
    #[serde(default)]
    pub course_name: String,
    /// Free-text semester label (e.g. "Học kỳ 1 (2023 - 2024)").
    #[serde(default)]
    pub semester: String,
    /// Free-text data-type tag, used to spot out-of-cycle courses.
    #[serde(default)]
    pub data_type: String,
    /// Credit count.
    #[serde(default)]
    pub credits: Option<RawScore>,
    /// Final score on the 10-point scale.
    #[serde(default)]
    pub score_10: Option<RawScore>,
    /// Final score on the 4-point scale.
    #[serde(default)]
    pub score_4: Option<RawScore>,
    /// Letter grade (A, B+, ...).
    #[serde(default)]
    pub letter_grade: Option<String>,
    /// Pass/fail result text.
    #[serde(default)]
    pub result: Option<String>,
    /// Explicit backend decision to keep this row out of GPA.
    #[serde(default)]
    pub exclude_from_gpa: Option<bool>,
    /// Display-only component scores.
    #[serde(default)]
    pub components: ComponentScores,
}

impl GradeRecord {
    /// Creates a record with the identifying fields set and everything else empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use gpa_engine::models::{GradeRecord, RawScore};
    ///
    /// let record = GradeRecord {
    ///     credits: Some(3.into()),
    ///     score_10: Some("8.5".into()),
    ///     ..GradeRecord::course("A1", "Toán cao cấp", "1 (2022-2023)")
    /// };
    /// assert_eq!(record.course_code, "A1");
    /// assert_eq!(record.score_10, Some(RawScore::Text("8.5".to_string())));
    /// ```
    pub fn course(code: &str, name: &str, semester: &str) -> Self {
        Self {
            course_code: code.to_string(),
            course_name: name.to_string(),
            semester: semester.to_string(),
            ..Self::default()
        }
    }

    /// Returns true if the row names a course and should appear in grade tables.
    pub fn is_displayable(&self) -> bool {
        !self.course_name.trim().is_empty()
    }
}
