//! Configuration types for GPA computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the validated
//! [`GradingPolicy`] the calculation functions consume.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// Course codes that never count towards GPA (English placement tests).
pub const DEFAULT_EXCLUDED_COURSE_CODES: [&str; 3] = ["0101000515", "0101000509", "0101000518"];

/// Course-name phrases identifying physical education, defence education
/// and English placement testing, in both accented and ASCII spellings.
pub const DEFAULT_EXCLUDED_NAME_KEYWORDS: [&str; 15] = [
    "giáo dục thể chất",
    "gdtc",
    "giáo dục quốc phòng",
    "gdqp",
    "thể dục",
    "toeic",
    "tiếng anh đầu vào",
    "tieng anh dau vao",
    "english placement",
    "xếp lớp tiếng anh",
    "xep lop tieng anh",
    "kiểm tra đầu vào tiếng anh",
    "kiem tra dau vao tieng anh",
    "điểm test tiếng anh đầu vào",
    "diem test tieng anh dau vao",
];

/// Bucket label for out-of-cycle coursework.
pub const DEFAULT_ADVANCED_STUDY_LABEL: &str = "Học vượt";

/// Bucket label for records with no usable semester information.
pub const DEFAULT_OTHER_LABEL: &str = "Khác";

/// Number of class changes a regular user gets per day.
pub const DEFAULT_CLASS_CHANGE_LIMIT: u32 = 3;

/// Metadata about the institution whose grading rules are configured.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstitutionMetadata {
    /// Short institution code.
    pub code: String,
    /// Human-readable institution name.
    pub name: String,
    /// Version or effective date of the rule set.
    pub version: String,
    /// Where the rules were sourced from.
    pub source_url: String,
}

impl Default for InstitutionMetadata {
    fn default() -> Self {
        Self {
            code: "default".to_string(),
            name: "Built-in grading policy".to_string(),
            version: "builtin".to_string(),
            source_url: String::new(),
        }
    }
}

/// Exclusion rules from exclusions.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct ExclusionConfig {
    /// Course codes that are always excluded.
    #[serde(default)]
    pub course_codes: Vec<String>,
    /// Name phrases that exclude a course when contained in its name.
    #[serde(default)]
    pub name_keywords: Vec<String>,
}

/// Semester bucketing and access settings from semesters.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct SemesterConfig {
    /// Label of the advanced-study bucket.
    pub advanced_study_label: String,
    /// Label of the fallback bucket.
    pub other_label: String,
    /// Daily class-change allowance for regular users.
    #[serde(default = "default_class_change_limit")]
    pub class_change_limit: u32,
}

fn default_class_change_limit() -> u32 {
    DEFAULT_CLASS_CHANGE_LIMIT
}

/// The validated rule set used by every calculation.
///
/// Keywords are stored lower-cased so that classification only has to
/// lower-case the course name.
#[derive(Debug, Clone)]
pub struct GradingPolicy {
    metadata: InstitutionMetadata,
    excluded_course_codes: HashSet<String>,
    excluded_name_keywords: Vec<String>,
    advanced_study_label: String,
    other_label: String,
    class_change_limit: u32,
}

impl GradingPolicy {
    /// Builds a policy from its configuration parts.
    ///
    /// Returns `InvalidPolicy` if a bucket label is blank, both labels are
    /// equal, or the class-change limit is zero.
    pub fn new(
        metadata: InstitutionMetadata,
        exclusions: ExclusionConfig,
        semesters: SemesterConfig,
    ) -> EngineResult<Self> {
        let advanced_study_label = semesters.advanced_study_label.trim().to_string();
        let other_label = semesters.other_label.trim().to_string();

        if advanced_study_label.is_empty() {
            return Err(EngineError::InvalidPolicy {
                message: "advanced_study_label must not be empty".to_string(),
            });
        }
        if other_label.is_empty() {
            return Err(EngineError::InvalidPolicy {
                message: "other_label must not be empty".to_string(),
            });
        }
        if advanced_study_label == other_label {
            return Err(EngineError::InvalidPolicy {
                message: format!(
                    "advanced_study_label and other_label must differ (both '{}')",
                    other_label
                ),
            });
        }
        if semesters.class_change_limit == 0 {
            return Err(EngineError::InvalidPolicy {
                message: "class_change_limit must be at least 1".to_string(),
            });
        }

        Ok(Self {
            metadata,
            excluded_course_codes: exclusions
                .course_codes
                .iter()
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty())
                .collect(),
            excluded_name_keywords: exclusions
                .name_keywords
                .iter()
                .map(|keyword| keyword.trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
            advanced_study_label,
            other_label,
            class_change_limit: semesters.class_change_limit,
        })
    }

    /// Returns the institution metadata.
    pub fn metadata(&self) -> &InstitutionMetadata {
        &self.metadata
    }

    /// Returns true if the trimmed course code is on the denylist.
    pub fn is_excluded_code(&self, code: &str) -> bool {
        self.excluded_course_codes.contains(code.trim())
    }

    /// Returns the first keyword contained in an already lower-cased name.
    pub fn matching_keyword(&self, lowered_name: &str) -> Option<&str> {
        self.excluded_name_keywords
            .iter()
            .find(|keyword| lowered_name.contains(keyword.as_str()))
            .map(String::as_str)
    }

    /// Returns the advanced-study bucket label.
    pub fn advanced_study_label(&self) -> &str {
        &self.advanced_study_label
    }

    /// Returns the fallback bucket label.
    pub fn other_label(&self) -> &str {
        &self.other_label
    }

    /// Returns the daily class-change allowance.
    pub fn class_change_limit(&self) -> u32 {
        self.class_change_limit
    }
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            metadata: InstitutionMetadata::default(),
            excluded_course_codes: DEFAULT_EXCLUDED_COURSE_CODES
                .iter()
                .map(|code| code.to_string())
                .collect(),
            excluded_name_keywords: DEFAULT_EXCLUDED_NAME_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
            advanced_study_label: DEFAULT_ADVANCED_STUDY_LABEL.to_string(),
            other_label: DEFAULT_OTHER_LABEL.to_string(),
            class_change_limit: DEFAULT_CLASS_CHANGE_LIMIT,
        }
    }
}
