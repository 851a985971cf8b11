//! GPA eligibility classification.
//!
//! A record is excluded from GPA when any of four independent layers
//! matches, checked in this order:
//!
//! 1. The backend set `exclude_from_gpa`.
//! 2. The course code is on the policy's denylist.
//! 3. The course name contains an excluded keyword (physical education,
//!    defence education, English placement testing).
//! 4. The 10-point score parses to more than 10, which marks a
//!    non-academic row.
//!
//! Credits and the 4-point score are not considered here; records without
//! usable numbers are dropped later, during aggregation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::GradingPolicy;
use crate::models::GradeRecord;

use super::score::{SCALE_10_MAX, parse_score};

/// Why a record was excluded from GPA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The data provider flagged the record.
    BackendFlag,
    /// The course code is on the denylist.
    ExcludedCourseCode {
        /// The matching code.
        code: String,
    },
    /// The course name contains an excluded phrase.
    NameKeyword {
        /// The matching phrase.
        keyword: String,
    },
    /// The 10-point score exceeds the scale.
    ScoreOutOfRange {
        /// The parsed score.
        score: Decimal,
    },
}

/// Determines which exclusion layer, if any, applies to a record.
///
/// # Examples
///
/// ```
/// use gpa_engine::calculation::{ExclusionReason, classify_exclusion};
/// use gpa_engine::config::GradingPolicy;
/// use gpa_engine::models::GradeRecord;
///
/// let policy = GradingPolicy::default();
/// let pe = GradeRecord::course("PE01", "Giáo dục thể chất 1", "1 (2022-2023)");
///
/// assert_eq!(
///     classify_exclusion(&pe, &policy),
///     Some(ExclusionReason::NameKeyword { keyword: "giáo dục thể chất".to_string() })
/// );
/// ```
pub fn classify_exclusion(record: &GradeRecord, policy: &GradingPolicy) -> Option<ExclusionReason> {
    if record.exclude_from_gpa == Some(true) {
        return Some(ExclusionReason::BackendFlag);
    }

    let code = record.course_code.trim();
    if policy.is_excluded_code(code) {
        return Some(ExclusionReason::ExcludedCourseCode {
            code: code.to_string(),
        });
    }

    // Keywords are never empty, so a blank name cannot match.
    let name = record.course_name.trim().to_lowercase();
    if let Some(keyword) = policy.matching_keyword(&name) {
        return Some(ExclusionReason::NameKeyword {
            keyword: keyword.to_string(),
        });
    }

    match parse_score(record.score_10.as_ref()) {
        Some(score) if score > SCALE_10_MAX => Some(ExclusionReason::ScoreOutOfRange { score }),
        _ => None,
    }
}

/// Returns true if the record must not contribute to GPA.
pub fn is_excluded_from_gpa(record: &GradeRecord, policy: &GradingPolicy) -> bool {
    classify_exclusion(record, policy).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawScore;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_record(code: &str, name: &str, score_10: &str) -> GradeRecord {
        GradeRecord {
            credits: Some(RawScore::from("3")),
            score_10: Some(RawScore::from(score_10)),
            ..GradeRecord::course(code, name, "Học kỳ 1 (2023 - 2024)")
        }
    }

    #[test]
    fn test_regular_course_is_included() {
        let policy = GradingPolicy::default();
        let record = create_test_record("0101001234", "Giải tích 1", "8.5");

        assert_eq!(classify_exclusion(&record, &policy), None);
        assert!(!is_excluded_from_gpa(&record, &policy));
    }

    #[test]
    fn test_backend_flag_excludes() {
        let policy = GradingPolicy::default();
        let mut record = create_test_record("0101001234", "Giải tích 1", "8.5");
        record.exclude_from_gpa = Some(true);

        assert_eq!(
            classify_exclusion(&record, &policy),
            Some(ExclusionReason::BackendFlag)
        );
    }

    #[test]
    fn test_backend_flag_false_does_not_force_inclusion() {
        let policy = GradingPolicy::default();
        let mut record = create_test_record("0101001234", "Giáo dục quốc phòng", "8.5");
        record.exclude_from_gpa = Some(false);

        assert!(is_excluded_from_gpa(&record, &policy));
    }

    #[test]
    fn test_denylisted_code_excludes_even_with_padding() {
        let policy = GradingPolicy::default();
        let record = create_test_record(" 0101000515 ", "Tiếng Anh", "7.0");

        assert_eq!(
            classify_exclusion(&record, &policy),
            Some(ExclusionReason::ExcludedCourseCode {
                code: "0101000515".to_string()
            })
        );
    }

    #[test]
    fn test_physical_education_keyword_excludes() {
        let policy = GradingPolicy::default();
        let record = create_test_record("PE01", "Giáo dục thể chất 1", "9.0");

        assert!(is_excluded_from_gpa(&record, &policy));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let policy = GradingPolicy::default();
        let record = create_test_record("X1", "  GDQP - Học phần 2 ", "7.0");

        assert_eq!(
            classify_exclusion(&record, &policy),
            Some(ExclusionReason::NameKeyword {
                keyword: "gdqp".to_string()
            })
        );
    }

    #[test]
    fn test_ascii_folded_placement_keyword_excludes() {
        let policy = GradingPolicy::default();
        let record = create_test_record("X2", "Kiem tra dau vao tieng Anh", "6.0");

        assert!(is_excluded_from_gpa(&record, &policy));
    }

    #[test]
    fn test_score_above_ten_excludes() {
        let policy = GradingPolicy::default();
        let record = create_test_record("0101009999", "Toeic-like score row", "15");

        // Keyword layer wins first for "toeic"
        assert!(matches!(
            classify_exclusion(&record, &policy),
            Some(ExclusionReason::NameKeyword { .. })
        ));

        let record = create_test_record("0101009999", "Chứng chỉ ngoại ngữ", "450");
        assert_eq!(
            classify_exclusion(&record, &policy),
            Some(ExclusionReason::ScoreOutOfRange { score: dec("450") })
        );
    }

    #[test]
    fn test_score_of_exactly_ten_is_included() {
        let policy = GradingPolicy::default();
        let record = create_test_record("A1", "Toán rời rạc", "10");

        assert!(!is_excluded_from_gpa(&record, &policy));
    }

    #[test]
    fn test_unparsable_score_is_not_an_exclusion() {
        let policy = GradingPolicy::default();
        let record = create_test_record("A1", "Toán rời rạc", "Miễn");

        assert!(!is_excluded_from_gpa(&record, &policy));
    }

    #[test]
    fn test_empty_name_skips_keyword_layer() {
        let policy = GradingPolicy::default();
        let record = create_test_record("", "", "8.0");

        assert_eq!(classify_exclusion(&record, &policy), None);
    }

    #[test]
    fn test_reason_serializes_with_layer_tag() {
        let reason = ExclusionReason::NameKeyword {
            keyword: "gdtc".to_string(),
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["layer"], "name_keyword");
        assert_eq!(json["keyword"], "gdtc");
    }
}
