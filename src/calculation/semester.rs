//! Semester label normalization.
//!
//! Exporter versions disagree on how they mark out-of-cycle ("advanced
//! study") courses: some put `HV` in the semester column, some in the
//! data-type column, some only append a marker to the course name. All of
//! those signals are checked before falling back to the raw label.

use tracing::debug;

use crate::config::GradingPolicy;
use crate::models::{GradeRecord, SemesterKey};

use super::text::fold_diacritics;

/// Exact (case-insensitive) short code for advanced study.
const ADVANCED_STUDY_CODE: &str = "hv";

/// Diacritic-folded phrase for advanced study.
const ADVANCED_STUDY_PHRASE: &str = "hoc vuot";

/// Course-name suffixes that mark advanced study.
const ADVANCED_STUDY_NAME_MARKERS: [&str; 3] = ["_ hv", "(hoc vuot)", "(hv)"];

/// Returns true if any field of the record marks it as advanced study.
pub fn is_advanced_study(record: &GradeRecord) -> bool {
    let label_marks = |field: &str| {
        let field = field.trim();
        field.eq_ignore_ascii_case(ADVANCED_STUDY_CODE)
            || fold_diacritics(field).contains(ADVANCED_STUDY_PHRASE)
    };

    if label_marks(&record.semester) || label_marks(&record.data_type) {
        return true;
    }

    let name = record.course_name.trim().to_lowercase();
    let folded_name = fold_diacritics(&name);
    ADVANCED_STUDY_NAME_MARKERS
        .iter()
        .any(|marker| name.contains(marker) || folded_name.contains(marker))
}

/// Maps a record to the semester bucket it is displayed and filtered under.
///
/// In priority order:
/// 1. Advanced-study records go to the policy's advanced-study bucket.
/// 2. A blank semester label with a non-blank data-type tag uses the tag.
/// 3. Otherwise the trimmed semester label, or the "other" bucket if blank.
///
/// # Examples
///
/// ```
/// use gpa_engine::calculation::normalize_semester;
/// use gpa_engine::config::GradingPolicy;
/// use gpa_engine::models::GradeRecord;
///
/// let policy = GradingPolicy::default();
///
/// let regular = GradeRecord::course("A1", "Toán", " Học kỳ 1 (2023 - 2024) ");
/// assert_eq!(normalize_semester(&regular, &policy).as_str(), "Học kỳ 1 (2023 - 2024)");
///
/// let advanced = GradeRecord::course("A2", "Lý (HV)", "Học kỳ 1 (2023 - 2024)");
/// assert_eq!(normalize_semester(&advanced, &policy).as_str(), "Học vượt");
///
/// let unknown = GradeRecord::course("A3", "Hóa", "");
/// assert_eq!(normalize_semester(&unknown, &policy).as_str(), "Khác");
/// ```
pub fn normalize_semester(record: &GradeRecord, policy: &GradingPolicy) -> SemesterKey {
    if is_advanced_study(record) {
        debug!(
            course_code = %record.course_code,
            semester = %record.semester,
            "Record bucketed as advanced study"
        );
        return SemesterKey::new(policy.advanced_study_label());
    }

    let semester = record.semester.trim();
    let data_type = record.data_type.trim();

    if semester.is_empty() && !data_type.is_empty() {
        return SemesterKey::new(data_type);
    }
    if semester.is_empty() {
        return SemesterKey::new(policy.other_label());
    }
    SemesterKey::new(semester)
}
