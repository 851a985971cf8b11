//! What-if GPA projection on the 4-point scale.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::GpaResult;

use super::aggregate::round_gpa;
use super::score::SCALE_4_MAX;

/// A hypothetical course added on top of the real transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedCourse {
    /// Optional label, echoed back to the caller.
    #[serde(default)]
    pub name: Option<String>,
    /// Credit count, must be positive.
    pub credit: Decimal,
    /// Expected score on the 4-point scale.
    pub score: Decimal,
}

/// Outcome of a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// GPA before the simulated courses.
    pub current_gpa4: Option<Decimal>,
    /// GPA after the simulated courses, `None` with no credits at all.
    pub projected_gpa4: Option<Decimal>,
    /// Sum of the simulated credits.
    pub additional_credits: Decimal,
    /// Credits after the simulated courses.
    pub total_credits: Decimal,
    /// Points after the simulated courses.
    pub total_points4: Decimal,
}

fn validate(index: usize, course: &SimulatedCourse) -> EngineResult<()> {
    if course.credit <= Decimal::ZERO {
        return Err(EngineError::InvalidSimulatedCourse {
            index,
            message: format!("credit must be positive, got {}", course.credit),
        });
    }
    if course.score < Decimal::ZERO || course.score > SCALE_4_MAX {
        return Err(EngineError::InvalidSimulatedCourse {
            index,
            message: format!("score must be between 0 and 4, got {}", course.score),
        });
    }
    Ok(())
}

fn average(points: Decimal, credits: Decimal, which: &str) -> EngineResult<Option<Decimal>> {
    if credits <= Decimal::ZERO {
        return Ok(None);
    }
    points
        .checked_div(credits)
        .map(|gpa| Some(round_gpa(gpa)))
        .ok_or_else(|| EngineError::SimulationOverflow {
            message: format!("{} GPA cannot be computed", which),
        })
}

fn course_overflow(index: usize) -> EngineError {
    EngineError::InvalidSimulatedCourse {
        index,
        message: "credit or score pushes the totals out of range".to_string(),
    }
}

/// Projects the 4-point GPA after adding hypothetical courses.
///
/// `base` supplies the current credit and point totals. Every course is
/// validated before anything is summed, and the first invalid one is
/// reported by index. Totals that leave the decimal range are reported
/// as errors rather than wrapped or truncated.
///
/// # Examples
///
/// ```
/// use gpa_engine::calculation::{SimulatedCourse, simulate_gpa};
/// use gpa_engine::models::GpaResult;
/// use rust_decimal::Decimal;
///
/// let base = GpaResult {
///     total_credits: Decimal::from(10),
///     total_points4: Decimal::from(30),
///     ..GpaResult::default()
/// };
/// let courses = vec![SimulatedCourse {
///     name: Some("Đồ án".to_string()),
///     credit: Decimal::from(10),
///     score: Decimal::from(4),
/// }];
///
/// let result = simulate_gpa(&base, &courses).unwrap();
/// assert_eq!(result.projected_gpa4, Some(Decimal::new(350, 2)));
/// assert_eq!(result.additional_credits, Decimal::from(10));
/// ```
pub fn simulate_gpa(base: &GpaResult, courses: &[SimulatedCourse]) -> EngineResult<SimulationResult> {
    for (index, course) in courses.iter().enumerate() {
        validate(index, course)?;
    }

    let mut additional_credits = Decimal::ZERO;
    let mut total_credits = base.total_credits;
    let mut total_points4 = base.total_points4;
    for (index, course) in courses.iter().enumerate() {
        let points = course
            .score
            .checked_mul(course.credit)
            .ok_or_else(|| course_overflow(index))?;
        additional_credits = additional_credits
            .checked_add(course.credit)
            .ok_or_else(|| course_overflow(index))?;
        total_credits = total_credits
            .checked_add(course.credit)
            .ok_or_else(|| course_overflow(index))?;
        total_points4 = total_points4
            .checked_add(points)
            .ok_or_else(|| course_overflow(index))?;
    }

    Ok(SimulationResult {
        current_gpa4: average(base.total_points4, base.total_credits, "current")?,
        projected_gpa4: average(total_points4, total_credits, "projected")?,
        additional_credits,
        total_credits,
        total_points4,
    })
}
