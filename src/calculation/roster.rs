//! Class roster ranking.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GradingPolicy;
use crate::models::{GpaResult, GradeScale, Student};

use super::aggregate::{compute_cumulative_gpa, compute_semester_gpa};

/// Filters and sort settings for a roster view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterQuery {
    /// Semester bucket to rank by; cumulative GPA when absent.
    #[serde(default)]
    pub semester: Option<String>,
    /// Scale the ranking and display use.
    #[serde(default)]
    pub scale: GradeScale,
    /// Case-insensitive name or id fragment.
    #[serde(default)]
    pub search: Option<String>,
}

impl RosterQuery {
    /// Returns the semester filter if one was set and is not blank.
    pub fn semester_filter(&self) -> Option<&str> {
        self.semester
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One row of a ranked roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStudent<'a> {
    /// 1-based position after sorting.
    pub rank: usize,
    /// The student.
    pub student: &'a Student,
    /// GPA over the whole transcript.
    pub cumulative: GpaResult,
    /// GPA of the selected semester, when one was selected.
    pub semester: Option<GpaResult>,
    /// The ranking GPA on the query's scale, or "N/A".
    pub display: String,
}

impl RankedStudent<'_> {
    /// The GPA the row was ranked by.
    pub fn ranking_result(&self) -> &GpaResult {
        self.semester.as_ref().unwrap_or(&self.cumulative)
    }
}

/// Filters a roster by search term and sorts it by GPA, highest first.
///
/// Each student is aggregated once before sorting. The sort is stable, so
/// students with equal GPA keep their input order.
///
/// # Examples
///
/// ```
/// use gpa_engine::calculation::{RosterQuery, rank_roster};
/// use gpa_engine::config::GradingPolicy;
/// use gpa_engine::models::{GradeRecord, Student};
///
/// let student = |id: &str, score: &str| Student {
///     id: id.to_string(),
///     records: vec![GradeRecord {
///         credits: Some(3.into()),
///         score_10: Some(score.into()),
///         ..GradeRecord::course("A1", "Toán", "1 (2022-2023)")
///     }],
///     ..Student::default()
/// };
/// let roster = vec![student("sv1", "6.0"), student("sv2", "9.0")];
///
/// let ranked = rank_roster(&roster, &RosterQuery::default(), &GradingPolicy::default());
/// assert_eq!(ranked[0].student.id, "sv2");
/// assert_eq!(ranked[0].display, "3.60");
/// assert_eq!(ranked[1].rank, 2);
/// ```
pub fn rank_roster<'a>(
    students: &'a [Student],
    query: &RosterQuery,
    policy: &GradingPolicy,
) -> Vec<RankedStudent<'a>> {
    let search = query.search.as_deref().unwrap_or("");
    let semester = query.semester_filter();

    let mut rows: Vec<RankedStudent<'a>> = students
        .iter()
        .filter(|student| student.matches_search(search))
        .map(|student| RankedStudent {
            rank: 0,
            student,
            cumulative: compute_cumulative_gpa(student, policy),
            semester: semester.map(|s| compute_semester_gpa(student, s, policy)),
            display: String::new(),
        })
        .collect();

    let scale = query.scale;
    rows.sort_by(|a, b| {
        scale
            .value(b.ranking_result())
            .cmp(&scale.value(a.ranking_result()))
    });

    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index + 1;
        row.display = scale.display(row.ranking_result());
    }

    debug!(
        students = students.len(),
        matched = rows.len(),
        semester = semester.unwrap_or(""),
        "Roster ranked"
    );

    rows
}
