//! Grouping of transcript rows into ordered semester buckets.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::config::GradingPolicy;
use crate::models::{GpaResult, GradeRecord, SemesterKey, Student};

use super::aggregate::aggregate_records;
use super::ordering::compare_semesters;
use super::semester::normalize_semester;

/// One semester's worth of displayable rows and its GPA.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterGroup<'a> {
    /// The bucket key.
    pub key: SemesterKey,
    /// Rows with a course name, in transcript order.
    pub records: Vec<&'a GradeRecord>,
    /// GPA of the bucket.
    pub gpa: GpaResult,
}

/// Groups a student's records by normalized semester, most recent first.
///
/// Summary rows (blank course name) are left out of the display rows, and
/// buckets that end up with no rows are dropped. Each bucket's GPA is
/// computed over exactly that bucket's records, summary rows included.
/// Buckets are split on the exact key text, so labels differing only in
/// case form separate groups with separate GPAs.
pub fn group_by_semester<'a>(student: &'a Student, policy: &GradingPolicy) -> Vec<SemesterGroup<'a>> {
    let mut buckets: HashMap<SemesterKey, Vec<&'a GradeRecord>> = HashMap::new();
    for record in &student.records {
        buckets
            .entry(normalize_semester(record, policy))
            .or_default()
            .push(record);
    }

    let mut groups: Vec<SemesterGroup<'a>> = buckets
        .into_iter()
        .filter_map(|(key, records)| {
            let gpa = aggregate_records(records.iter().copied(), None, policy);
            let records: Vec<&GradeRecord> =
                records.into_iter().filter(|r| r.is_displayable()).collect();
            if records.is_empty() {
                return None;
            }
            Some(SemesterGroup { key, records, gpa })
        })
        .collect();

    groups.sort_by(|a, b| compare_semesters(a.key.as_str(), b.key.as_str()));
    groups
}

/// Collects every distinct semester bucket across students, in display order.
///
/// Used to populate the semester filter.
pub fn collect_semesters(students: &[Student], policy: &GradingPolicy) -> Vec<SemesterKey> {
    let distinct: BTreeSet<SemesterKey> = students
        .iter()
        .flat_map(|student| student.records.iter())
        .map(|record| normalize_semester(record, policy))
        .filter(|key| !key.as_str().is_empty())
        .collect();

    let mut semesters: Vec<SemesterKey> = distinct.into_iter().collect();
    semesters.sort_by(|a, b| compare_semesters(a.as_str(), b.as_str()));
    semesters
}
