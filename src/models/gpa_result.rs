//! GPA result value object and grading scales.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The outcome of aggregating a set of grade records.
///
/// A zero GPA is ambiguous on its own: check [`GpaResult::has_credits`] to
/// tell "no usable courses" apart from "all courses scored zero".
///
/// # Example
///
/// ```
/// use gpa_engine::models::GpaResult;
///
/// let empty = GpaResult::default();
/// assert!(!empty.has_credits());
/// assert!(empty.gpa4.is_zero());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpaResult {
    /// Credit-weighted average on the 4-point scale, rounded to 2 places.
    pub gpa4: Decimal,
    /// Credit-weighted average on the 10-point scale, rounded to 2 places.
    pub gpa10: Decimal,
    /// Credits that contributed to the averages.
    pub total_credits: Decimal,
    /// Unrounded Σ(score4 × credit).
    pub total_points4: Decimal,
    /// Unrounded Σ(score10 × credit).
    pub total_points10: Decimal,
}

impl GpaResult {
    /// Returns true if at least one credit contributed.
    pub fn has_credits(&self) -> bool {
        self.total_credits > Decimal::ZERO
    }
}

/// The grading scale a caller wants to see or sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeScale {
    /// The 0 to 4.0 scale.
    #[default]
    #[serde(rename = "4")]
    Four,
    /// The 0 to 10.0 scale.
    #[serde(rename = "10")]
    Ten,
}

impl GradeScale {
    /// Selects the GPA on this scale.
    pub fn value(self, result: &GpaResult) -> Decimal {
        match self {
            GradeScale::Four => result.gpa4,
            GradeScale::Ten => result.gpa10,
        }
    }

    /// Renders the GPA on this scale for display, or "N/A" when it is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use gpa_engine::models::{GpaResult, GradeScale};
    /// use rust_decimal::Decimal;
    ///
    /// let result = GpaResult {
    ///     gpa4: Decimal::new(36, 1),
    ///     gpa10: Decimal::new(900, 2),
    ///     ..GpaResult::default()
    /// };
    /// assert_eq!(GradeScale::Four.display(&result), "3.60");
    /// assert_eq!(GradeScale::Ten.display(&result), "9.00");
    /// assert_eq!(GradeScale::Four.display(&GpaResult::default()), "N/A");
    /// ```
    pub fn display(self, result: &GpaResult) -> String {
        let value = self.value(result);
        if value.is_zero() {
            "N/A".to_string()
        } else {
            format!("{:.2}", value)
        }
    }
}
