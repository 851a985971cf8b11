//! Credit-weighted GPA aggregation.
//!
//! Retakes are deduplicated by course: the later record in iteration order
//! replaces the earlier one, whatever its score. This mirrors the upstream
//! transcript, where the most recent entry supersedes previous attempts.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::config::GradingPolicy;
use crate::models::{GpaResult, GradeRecord, Student};

use super::classifier::classify_exclusion;
use super::score::{clean_score, parse_score};
use super::semester::normalize_semester;

/// Number of decimal places GPA figures are rounded to.
pub const GPA_DECIMAL_PLACES: u32 = 2;

/// Scores and credit of a record that can be summed.
#[derive(Debug, Clone, Copy)]
struct Contribution {
    s10: Decimal,
    s4: Decimal,
    credits: Decimal,
}

/// Builds the key under which retakes of the same course collapse.
///
/// The trimmed course code when present, otherwise the lower-cased trimmed
/// course name.
pub fn dedup_key(record: &GradeRecord) -> String {
    let code = record.course_code.trim();
    if code.is_empty() {
        format!("name:{}", record.course_name.trim().to_lowercase())
    } else {
        code.to_string()
    }
}

/// Rounds a GPA figure half-up to two decimal places.
///
/// # Examples
///
/// ```
/// use gpa_engine::calculation::round_gpa;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_gpa(Decimal::new(3145, 3)), Decimal::new(315, 2));
/// assert_eq!(round_gpa(Decimal::new(3144, 3)), Decimal::new(314, 2));
/// ```
pub fn round_gpa(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(GPA_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn contribution(record: &GradeRecord) -> Option<Contribution> {
    let credits = parse_score(record.credits.as_ref()).filter(|c| *c > Decimal::ZERO)?;
    let (s10, s4) = clean_score(record.score_10.as_ref(), record.score_4.as_ref()).both()?;
    Some(Contribution { s10, s4, credits })
}

/// Running credit and point sums.
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    points4: Decimal,
    points10: Decimal,
    credits: Decimal,
}

impl Totals {
    /// Adds a contribution, or returns `None` if any sum would overflow.
    fn checked_add(self, c: &Contribution) -> Option<Totals> {
        Some(Totals {
            points4: self.points4.checked_add(c.s4.checked_mul(c.credits)?)?,
            points10: self.points10.checked_add(c.s10.checked_mul(c.credits)?)?,
            credits: self.credits.checked_add(c.credits)?,
        })
    }
}

/// Aggregates records into a GPA result.
///
/// Records excluded by the classifier are skipped. When `semester_filter`
/// is given, only records whose normalized bucket matches it (ignoring
/// case) are kept. Each remaining course keeps only its last record; that
/// record adds to the sums only if it has positive credit and a usable
/// score, but it occupies the course's slot either way.
///
/// A record whose weighted points would overflow the running sums adds
/// nothing, like an unusable one.
///
/// When no credit contributes, both GPA figures are zero.
///
/// # Examples
///
/// ```
/// use gpa_engine::calculation::aggregate;
/// use gpa_engine::config::GradingPolicy;
/// use gpa_engine::models::GradeRecord;
/// use rust_decimal::Decimal;
///
/// let records = vec![
///     GradeRecord {
///         credits: Some(3.into()),
///         score_10: Some("8.5".into()),
///         ..GradeRecord::course("A1", "Toán", "1 (2022-2023)")
///     },
///     GradeRecord {
///         credits: Some(3.into()),
///         score_10: Some("9.0".into()),
///         ..GradeRecord::course("A1", "Toán", "1 (2022-2023)")
///     },
/// ];
///
/// let result = aggregate(&records, None, &GradingPolicy::default());
/// assert_eq!(result.gpa10, Decimal::new(900, 2));
/// assert_eq!(result.gpa4, Decimal::new(360, 2));
/// assert_eq!(result.total_credits, Decimal::new(3, 0));
/// ```
pub fn aggregate(
    records: &[GradeRecord],
    semester_filter: Option<&str>,
    policy: &GradingPolicy,
) -> GpaResult {
    aggregate_records(records, semester_filter, policy)
}

/// [`aggregate`] over any sequence of borrowed records.
pub(crate) fn aggregate_records<'a, I>(
    records: I,
    semester_filter: Option<&str>,
    policy: &GradingPolicy,
) -> GpaResult
where
    I: IntoIterator<Item = &'a GradeRecord>,
{
    let mut slot_index: HashMap<String, usize> = HashMap::new();
    let mut slots: Vec<(&'a GradeRecord, Option<Contribution>)> = Vec::new();

    for record in records {
        if let Some(reason) = classify_exclusion(record, policy) {
            debug!(
                course_code = %record.course_code,
                reason = ?reason,
                "Record excluded from GPA"
            );
            continue;
        }
        if let Some(filter) = semester_filter {
            if !normalize_semester(record, policy).matches(filter) {
                continue;
            }
        }

        let entry = (record, contribution(record));
        match slot_index.entry(dedup_key(record)) {
            Entry::Occupied(slot) => {
                debug!(
                    course_code = %record.course_code,
                    course_name = %record.course_name,
                    "Later attempt supersedes earlier record"
                );
                slots[*slot.get()] = entry;
            }
            Entry::Vacant(slot) => {
                slot.insert(slots.len());
                slots.push(entry);
            }
        }
    }

    let mut totals = Totals::default();
    for (record, contribution) in &slots {
        let Some(contribution) = contribution else {
            continue;
        };
        match totals.checked_add(contribution) {
            Some(next) => totals = next,
            None => debug!(
                course_code = %record.course_code,
                credits = %contribution.credits,
                "Record skipped, totals would overflow"
            ),
        }
    }

    if totals.credits.is_zero() {
        return GpaResult::default();
    }

    let average = |points: Decimal| {
        points
            .checked_div(totals.credits)
            .map(round_gpa)
            .unwrap_or_default()
    };

    GpaResult {
        gpa4: average(totals.points4),
        gpa10: average(totals.points10),
        total_credits: totals.credits,
        total_points4: totals.points4,
        total_points10: totals.points10,
    }
}

/// Computes the cumulative GPA over all of a student's records.
pub fn compute_cumulative_gpa(student: &Student, policy: &GradingPolicy) -> GpaResult {
    aggregate(&student.records, None, policy)
}

/// Computes the GPA of one semester bucket.
///
/// `semester` is compared case-insensitively against each record's
/// normalized bucket, so any key produced by
/// [`normalize_semester`](super::normalize_semester) selects its records.
pub fn compute_semester_gpa(student: &Student, semester: &str, policy: &GradingPolicy) -> GpaResult {
    aggregate(&student.records, Some(semester), policy)
}
