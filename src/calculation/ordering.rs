//! Chronological ordering of free-text semester labels.
//!
//! Labels look like "Học kỳ 1 (2023 - 2024)", "1 (2022-2023)", "HK phụ 2024"
//! or "Chứng chỉ". Each label is reduced to a year and a term number; the
//! most recent semester sorts first and unclassifiable labels sort last.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::text::fold_diacritics;

// Regex patterns (compiled once via LazyLock)

static YEAR_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4})\s*-\s*([0-9]{4})").unwrap());

static SINGLE_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"20[0-9]{2}").unwrap());

static TERM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^0-9])([123])(?:$|[^0-9])").unwrap());

/// "phụ" as a whole word, matched on the diacritic-folded label so that
/// "phục" or "phuc" do not count.
static SUPPLEMENTARY_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bphu\b").unwrap());

/// Term assigned to summer and supplementary semesters: after terms 1 and 2,
/// and after a regular term 3 of the same year.
pub const SUPPLEMENTARY_TERM: Decimal = Decimal::from_parts(35, 0, 0, false, 1);

/// The sortable parts of a semester label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterOrdinal {
    /// Academic year (first year of a range), or 0 when absent.
    pub year: i32,
    /// Term number 1, 2, 3 or 3.5, or 0 when absent.
    pub term: Decimal,
    /// True when neither a year nor a term was found.
    pub is_other: bool,
}

/// Extracts the year and term from a semester label.
///
/// # Examples
///
/// ```
/// use gpa_engine::calculation::parse_semester_label;
/// use rust_decimal::Decimal;
///
/// let ordinal = parse_semester_label("Học kỳ 2 (2023 - 2024)");
/// assert_eq!(ordinal.year, 2023);
/// assert_eq!(ordinal.term, Decimal::from(2));
/// assert!(!ordinal.is_other);
///
/// assert!(parse_semester_label("Chứng chỉ").is_other);
/// ```
pub fn parse_semester_label(label: &str) -> SemesterOrdinal {
    let year = YEAR_RANGE_RE
        .captures(label)
        .and_then(|caps| caps.get(1))
        .or_else(|| SINGLE_YEAR_RE.find(label))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .unwrap_or(0);

    let mut term = TERM_RE
        .captures(label)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(Decimal::from)
        .unwrap_or(Decimal::ZERO);

    let lowered = label.to_lowercase();
    if SUPPLEMENTARY_WORD_RE.is_match(&fold_diacritics(&lowered))
        || lowered.contains("hè")
        || lowered.contains("hé")
    {
        term = SUPPLEMENTARY_TERM;
    }

    SemesterOrdinal {
        year,
        term,
        is_other: year == 0 && term.is_zero(),
    }
}

/// Orders two semester labels, most recent first.
///
/// Classifiable labels come before "other" labels. Classifiable labels are
/// ordered by descending year, then descending term; labels that tie on
/// both fall back to their text so the order is total. "Other" labels are
/// ordered by their text.
///
/// # Examples
///
/// ```
/// use gpa_engine::calculation::compare_semesters;
/// use std::cmp::Ordering;
///
/// assert_eq!(
///     compare_semesters("Học kỳ 2 (2023 - 2024)", "Học kỳ 1 (2023 - 2024)"),
///     Ordering::Less
/// );
/// assert_eq!(
///     compare_semesters("Chứng chỉ", "Học kỳ 1 (2023 - 2024)"),
///     Ordering::Greater
/// );
/// ```
pub fn compare_semesters(a: &str, b: &str) -> Ordering {
    let pa = parse_semester_label(a);
    let pb = parse_semester_label(b);

    match (pa.is_other, pb.is_other) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => a.cmp(b),
        (false, false) => pb
            .year
            .cmp(&pa.year)
            .then_with(|| pb.term.cmp(&pa.term))
            .then_with(|| a.cmp(b)),
    }
}

/// Sorts semester labels in display order.
pub fn sort_semesters<S: AsRef<str>>(labels: &mut [S]) {
    labels.sort_by(|a, b| compare_semesters(a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn term(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_parse_year_range_with_spaces() {
        let ordinal = parse_semester_label("Học kỳ 1 (2023 - 2024)");
        assert_eq!(ordinal.year, 2023);
        assert_eq!(ordinal.term, term(1));
    }

    #[test]
    fn test_parse_compact_year_range() {
        let ordinal = parse_semester_label("2 (2022-2023)");
        assert_eq!(ordinal.year, 2022);
        assert_eq!(ordinal.term, term(2));
    }

    #[test]
    fn test_parse_single_year_fallback() {
        let ordinal = parse_semester_label("HK3 năm 2021");
        assert_eq!(ordinal.year, 2021);
        assert_eq!(ordinal.term, term(3));
    }

    #[test]
    fn test_term_digit_inside_year_is_ignored() {
        let ordinal = parse_semester_label("2023 - 2024");
        assert_eq!(ordinal.year, 2023);
        assert_eq!(ordinal.term, Decimal::ZERO);
        assert!(!ordinal.is_other);
    }

    #[test]
    fn test_summer_and_supplementary_terms() {
        assert_eq!(
            parse_semester_label("Học kỳ phụ (2023 - 2024)").term,
            SUPPLEMENTARY_TERM
        );
        assert_eq!(
            parse_semester_label("Học kỳ hè (2023 - 2024)").term,
            SUPPLEMENTARY_TERM
        );
        assert_eq!(parse_semester_label("HK phu 2 2024").term, SUPPLEMENTARY_TERM);
        assert_eq!(SUPPLEMENTARY_TERM, Decimal::new(35, 1));
    }

    #[test]
    fn test_words_containing_phu_are_not_supplementary() {
        let ordinal = parse_semester_label("Học kỳ 2 phục hồi (2023 - 2024)");
        assert_eq!(ordinal.term, Decimal::from(2));

        assert_eq!(parse_semester_label("HK2 phuc khao 2024").term, Decimal::from(2));
        assert_eq!(parse_semester_label("Học kỳ PHỤ 2024").term, SUPPLEMENTARY_TERM);
    }

    #[test]
    fn test_unclassifiable_labels_are_other() {
        assert!(parse_semester_label("Chứng chỉ").is_other);
        assert!(parse_semester_label("Học vượt").is_other);
        assert!(parse_semester_label("Khác").is_other);
    }

    #[test]
    fn test_term_two_sorts_before_term_one() {
        assert_eq!(
            compare_semesters("Học kỳ 2 (2023 - 2024)", "Học kỳ 1 (2023 - 2024)"),
            Ordering::Less
        );
    }

    #[test]
    fn test_newer_year_sorts_first() {
        assert_eq!(
            compare_semesters("Học kỳ 1 (2024 - 2025)", "Học kỳ 2 (2023 - 2024)"),
            Ordering::Less
        );
    }

    #[test]
    fn test_supplementary_term_sorts_before_regular_terms() {
        let mut labels = vec![
            "Học kỳ 1 (2023 - 2024)",
            "Học kỳ phụ (2023 - 2024)",
            "Học kỳ 2 (2023 - 2024)",
        ];
        sort_semesters(&mut labels);
        assert_eq!(
            labels,
            vec![
                "Học kỳ phụ (2023 - 2024)",
                "Học kỳ 2 (2023 - 2024)",
                "Học kỳ 1 (2023 - 2024)",
            ]
        );
    }

    #[test]
    fn test_other_labels_sort_last_alphabetically() {
        let mut labels = vec![
            "Khác".to_string(),
            "Học kỳ 1 (2023 - 2024)".to_string(),
            "Chứng chỉ".to_string(),
            "Học kỳ 2 (2023 - 2024)".to_string(),
        ];
        sort_semesters(&mut labels);
        assert_eq!(
            labels,
            vec![
                "Học kỳ 2 (2023 - 2024)",
                "Học kỳ 1 (2023 - 2024)",
                "Chứng chỉ",
                "Khác",
            ]
        );
    }

    #[test]
    fn test_ties_break_on_text() {
        assert_eq!(
            compare_semesters("1 (2023-2024)", "Học kỳ 1 (2023 - 2024)"),
            Ordering::Less
        );
        assert_eq!(
            compare_semesters("Học kỳ 1 (2023 - 2024)", "Học kỳ 1 (2023 - 2024)"),
            Ordering::Equal
        );
    }

    proptest! {
        #[test]
        fn prop_compare_is_antisymmetric(a in "[ -~ọỳ]{0,24}", b in "[ -~ọỳ]{0,24}") {
            prop_assert_eq!(compare_semesters(&a, &b), compare_semesters(&b, &a).reverse());
        }

        #[test]
        fn prop_labelled_semesters_precede_other(year in 2000i32..2099, t in 1u8..=3) {
            let label = format!("Học kỳ {} ({} - {})", t, year, year + 1);
            prop_assert_eq!(compare_semesters(&label, "Chứng chỉ"), Ordering::Less);
        }
    }
}
