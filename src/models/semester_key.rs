//! Canonical semester bucket key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The bucket a grade record normalizes into.
///
/// Buckets are grouped by their exact trimmed text. Filtering by a
/// user-selected semester goes through [`SemesterKey::matches`], which
/// ignores case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemesterKey(String);

impl SemesterKey {
    /// Creates a key from a label, trimming surrounding whitespace.
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_string())
    }

    /// Returns the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `filter` selects this bucket.
    ///
    /// # Examples
    ///
    /// ```
    /// use gpa_engine::models::SemesterKey;
    ///
    /// let key = SemesterKey::new("Học kỳ 1 (2023 - 2024)");
    /// assert!(key.matches("  học kỳ 1 (2023 - 2024) "));
    /// assert!(!key.matches("Học kỳ 2 (2023 - 2024)"));
    /// ```
    pub fn matches(&self, filter: &str) -> bool {
        self.0.to_lowercase() == filter.trim().to_lowercase()
    }
}

impl fmt::Display for SemesterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SemesterKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_label() {
        assert_eq!(SemesterKey::new("  HK1  ").as_str(), "HK1");
    }

    #[test]
    fn test_equality_is_case_sensitive() {
        assert_ne!(SemesterKey::new("Học vượt"), SemesterKey::new("học vượt"));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        assert!(SemesterKey::new("Học vượt").matches("HỌC VƯỢT"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&SemesterKey::new("Khác")).unwrap();
        assert_eq!(json, "\"Khác\"");
    }
}
