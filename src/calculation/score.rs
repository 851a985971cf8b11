//! Score cleaning and scale conversion.
//!
//! Upstream scores are free-form. This module turns them into validated
//! decimals on both the 10-point and 4-point scales, deriving a missing
//! scale linearly from the other.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::models::RawScore;

/// Upper bound of the 10-point scale.
pub const SCALE_10_MAX: Decimal = Decimal::TEN;

/// Upper bound of the 4-point scale.
pub const SCALE_4_MAX: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

/// A pair of scores that passed range validation.
///
/// Either both fields are `Some` or both are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanedScore {
    /// Score on the 10-point scale.
    pub s10: Option<Decimal>,
    /// Score on the 4-point scale.
    pub s4: Option<Decimal>,
}

impl CleanedScore {
    /// Returns both scores when the pair is usable.
    pub fn both(&self) -> Option<(Decimal, Decimal)> {
        self.s10.zip(self.s4)
    }
}

/// Parses a raw upstream value into a decimal.
///
/// Numbers are taken as-is (non-finite floats are rejected). Text is
/// trimmed, comma decimal separators become dots, and the result is parsed
/// as a plain or scientific-notation decimal. Blank text is `None`, not
/// zero: an ungraded cell means "no score yet".
///
/// # Examples
///
/// ```
/// use gpa_engine::calculation::parse_score;
/// use gpa_engine::models::RawScore;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_score(Some(&RawScore::from(" 8,5 "))), Some(Decimal::new(85, 1)));
/// assert_eq!(parse_score(Some(&RawScore::from("abc"))), None);
/// assert_eq!(parse_score(None), None);
/// ```
pub fn parse_score(raw: Option<&RawScore>) -> Option<Decimal> {
    match raw? {
        RawScore::Number(value) => Decimal::from_f64(*value),
        RawScore::Text(text) => {
            let text = text.trim().replace(',', ".");
            if text.is_empty() {
                return None;
            }
            if text.contains(['e', 'E']) {
                Decimal::from_scientific(&text).ok()
            } else {
                Decimal::from_str(&text).ok()
            }
        }
    }
}

/// Validates a pair of raw scores and fills in a missing scale.
///
/// A 10-point score outside [0, 10] or a 4-point score outside [0, 4] is
/// discarded. If exactly one scale survives, the other is derived by
/// linear scaling (`s4 = s10 * 4 / 10`, `s10 = s4 * 10 / 4`).
///
/// # Examples
///
/// ```
/// use gpa_engine::calculation::clean_score;
/// use gpa_engine::models::RawScore;
/// use rust_decimal::Decimal;
///
/// let cleaned = clean_score(Some(&RawScore::from("8.0")), None);
/// assert_eq!(cleaned.s4, Some(Decimal::new(32, 1)));
///
/// let rejected = clean_score(Some(&RawScore::from("15")), None);
/// assert_eq!(rejected.s10, None);
/// assert_eq!(rejected.s4, None);
/// ```
pub fn clean_score(raw10: Option<&RawScore>, raw4: Option<&RawScore>) -> CleanedScore {
    let s10 = parse_score(raw10).filter(|v| in_range(*v, SCALE_10_MAX));
    let s4 = parse_score(raw4).filter(|v| in_range(*v, SCALE_4_MAX));

    match (s10, s4) {
        (Some(s10), Some(s4)) => CleanedScore {
            s10: Some(s10),
            s4: Some(s4),
        },
        (Some(s10), None) => CleanedScore {
            s10: Some(s10),
            s4: Some(s10 * SCALE_4_MAX / SCALE_10_MAX),
        },
        (None, Some(s4)) => CleanedScore {
            s10: Some(s4 * SCALE_10_MAX / SCALE_4_MAX),
            s4: Some(s4),
        },
        (None, None) => CleanedScore {
            s10: None,
            s4: None,
        },
    }
}

fn in_range(value: Decimal, max: Decimal) -> bool {
    value >= Decimal::ZERO && value <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn text(s: &str) -> RawScore {
        RawScore::from(s)
    }

    #[test]
    fn test_parse_accepts_numbers() {
        assert_eq!(parse_score(Some(&RawScore::Number(7.5))), Some(dec("7.5")));
        assert_eq!(parse_score(Some(&RawScore::Number(3.0))), Some(dec("3")));
    }

    #[test]
    fn test_parse_rejects_non_finite_numbers() {
        assert_eq!(parse_score(Some(&RawScore::Number(f64::NAN))), None);
        assert_eq!(parse_score(Some(&RawScore::Number(f64::INFINITY))), None);
    }

    #[test]
    fn test_parse_replaces_comma_separator() {
        assert_eq!(parse_score(Some(&text("6,75"))), Some(dec("6.75")));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_score(Some(&text("  9.0\t"))), Some(dec("9.0")));
    }

    #[test]
    fn test_parse_accepts_scientific_notation() {
        assert_eq!(parse_score(Some(&text("8.5e0"))), Some(dec("8.5")));
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert_eq!(parse_score(Some(&text(""))), None);
        assert_eq!(parse_score(Some(&text("   "))), None);
        assert_eq!(parse_score(Some(&text("Đạt"))), None);
        assert_eq!(parse_score(Some(&text("8.5.1"))), None);
    }

    #[test]
    fn test_blank_score_is_missing_not_zero() {
        // The portal leaves the cell blank for courses still in progress.
        // Reading that as 0 would count them as failed.
        let cleaned = clean_score(Some(&text("")), Some(&text(" ")));
        assert_eq!(cleaned.s10, None);
        assert_eq!(cleaned.s4, None);
        assert_ne!(parse_score(Some(&text(""))), Some(Decimal::ZERO));
    }

    #[test]
    fn test_clean_keeps_both_valid_scores() {
        let cleaned = clean_score(Some(&text("8.5")), Some(&text("3.7")));
        assert_eq!(cleaned.s10, Some(dec("8.5")));
        assert_eq!(cleaned.s4, Some(dec("3.7")));
    }

    #[test]
    fn test_clean_derives_scale_4_from_scale_10() {
        let cleaned = clean_score(Some(&text("8.0")), None);
        assert_eq!(cleaned.s10, Some(dec("8.0")));
        assert_eq!(cleaned.s4, Some(dec("3.2")));
    }

    #[test]
    fn test_clean_derives_scale_10_from_scale_4() {
        let cleaned = clean_score(None, Some(&text("3.0")));
        assert_eq!(cleaned.s10, Some(dec("7.5")));
        assert_eq!(cleaned.s4, Some(dec("3.0")));
    }

    #[test]
    fn test_clean_discards_out_of_range_scale_10() {
        let cleaned = clean_score(Some(&text("15")), None);
        assert_eq!(cleaned.s10, None);
        assert_eq!(cleaned.s4, None);
        assert_eq!(cleaned.both(), None);
    }

    #[test]
    fn test_clean_rederives_discarded_scale() {
        // s4 of 4.5 is invalid, so it is rebuilt from the valid s10
        let cleaned = clean_score(Some(&text("9")), Some(&text("4.5")));
        assert_eq!(cleaned.s4, Some(dec("3.6")));
    }

    #[test]
    fn test_clean_rejects_negative_scores() {
        let cleaned = clean_score(Some(&text("-1")), Some(&text("-0.5")));
        assert_eq!(cleaned.both(), None);
    }

    #[test]
    fn test_clean_accepts_range_boundaries() {
        let low = clean_score(Some(&text("0")), None);
        assert_eq!(low.both(), Some((dec("0"), dec("0"))));

        let high = clean_score(None, Some(&text("4")));
        assert_eq!(high.both(), Some((dec("10"), dec("4"))));
    }
}
