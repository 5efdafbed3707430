//! CPA target planner
//!
//! Given the student's current standing and a target cumulative average,
//! searches for a feasible distribution of future grades across the remaining
//! credits. The search space is a bounded integer grid (floor/A/A+ course
//! counts), enumerated in a fixed preference order: maximal use of the
//! student's ability-floor tier first, then A over A+. Exhaustive enumeration
//! with an early exit is both correct and fast at this scale; the result is
//! deterministic for identical inputs.

use crate::core::grading;
use crate::core::models::ScoreRecord;
use serde::{Deserialize, Serialize};

/// Aggregate points may miss the requirement by at most this much
/// (grade-point-credits) and still count as a match.
pub const POINT_TOLERANCE: f64 = 0.1;

/// Grade points of the "A" tier used for above-floor courses.
const A_POINTS: f64 = 3.8;

/// Grade points of the "A+" tier used for above-floor courses.
const A_PLUS_POINTS: f64 = 4.0;

/// One band of the ability ladder.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct AbilityBand {
    /// Display label (e.g. "B+")
    pub label: &'static str,
    /// Scale-4 grade points of the band
    pub points: f64,
}

/// The fixed 8-band grade ladder the ability floor indexes into, lowest
/// first. Points are the scale-4 values of the corresponding letter grades.
pub const GRADE_LADDER: [AbilityBand; 8] = [
    AbilityBand { label: "D", points: 1.0 },
    AbilityBand { label: "D+", points: 1.5 },
    AbilityBand { label: "C", points: 2.0 },
    AbilityBand { label: "C+", points: 2.4 },
    AbilityBand { label: "B", points: 3.0 },
    AbilityBand { label: "B+", points: 3.5 },
    AbilityBand { label: "A", points: 3.8 },
    AbilityBand { label: "A+", points: 4.0 },
];

/// Ladder index for a band label (case-insensitive), e.g. "B" -> 4.
#[must_use]
pub fn ability_index(label: &str) -> Option<usize> {
    GRADE_LADDER
        .iter()
        .position(|band| band.label.eq_ignore_ascii_case(label))
}

/// Inputs for one planning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningGoal {
    /// Credits already completed and counted
    pub current_credits: u32,
    /// Scale-4 points already earned (`scale4 * credit` summed)
    pub current_points: f64,
    /// Total credits of the degree target
    pub total_credits_target: u32,
    /// Target cumulative average on the 4.0 scale
    pub target_cpa: f64,
    /// Credits per remaining course (typically 2 or 3)
    pub credits_per_course: u32,
    /// Index into [`GRADE_LADDER`]: the minimum tier the student believes
    /// they can reliably achieve
    pub ability_floor: usize,
}

impl PlanningGoal {
    /// Grade points of the ability floor band (index clamped to the ladder).
    #[must_use]
    pub fn ability_points(&self) -> f64 {
        GRADE_LADDER[self.ability_floor.min(GRADE_LADDER.len() - 1)].points
    }
}

/// How the planning call turned out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// The target is already reached (no remaining credits, or no points
    /// needed)
    AlreadySatisfied,
    /// An exact distribution within tolerance was found
    Met,
    /// No exact uniform-course distribution exists; the nearest achievable
    /// split is reported instead
    Approximate,
    /// Even straight A+ grades cannot reach the target
    Infeasible,
}

/// Course counts per tier for the remaining credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeDistribution {
    /// Courses assumed at the ability floor
    pub at_floor: u32,
    /// Courses that must reach A (3.8)
    pub at_a: u32,
    /// Courses that must reach A+ (4.0)
    pub at_a_plus: u32,
    /// Aggregate scale-4 points the distribution earns over the remaining
    /// credits
    pub achieved_points: f64,
}

/// Outcome of one planning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningResult {
    /// Feasibility verdict
    pub status: PlanStatus,
    /// Credits still to be earned toward the target
    pub remaining_credits: u32,
    /// Points still needed to reach the target average
    pub needed_points: f64,
    /// Number of remaining course units (`ceil(remaining / credits_per_course)`)
    pub num_courses: u32,
    /// The chosen distribution; absent when already satisfied or infeasible
    pub distribution: Option<GradeDistribution>,
    /// Projected CPA under the chosen distribution. For `Infeasible` this is
    /// the best attainable average; for `AlreadySatisfied` the current one.
    pub projected_cpa: f64,
}

/// Solve for a grade distribution reaching the target CPA.
///
/// Steps: report already-satisfied goals without searching; rule out goals
/// beyond a straight-A+ ceiling (reporting the best attainable average);
/// accept the floor-only plan when it suffices; otherwise run the exact
/// search and, failing that, the deterministic nearest-fit fallback.
#[must_use]
pub fn solve(goal: &PlanningGoal) -> PlanningResult {
    let cpc = goal.credits_per_course.max(1);
    let total = f64::from(goal.total_credits_target);
    let current_cpa = if goal.current_credits > 0 {
        goal.current_points / f64::from(goal.current_credits)
    } else {
        0.0
    };

    let remaining = goal
        .total_credits_target
        .saturating_sub(goal.current_credits);
    if remaining == 0 {
        return PlanningResult {
            status: PlanStatus::AlreadySatisfied,
            remaining_credits: 0,
            needed_points: 0.0,
            num_courses: 0,
            distribution: None,
            projected_cpa: current_cpa,
        };
    }

    let needed = goal.target_cpa * total - goal.current_points;
    let num_courses = remaining.div_ceil(cpc);
    if needed <= 0.0 {
        return PlanningResult {
            status: PlanStatus::AlreadySatisfied,
            remaining_credits: remaining,
            needed_points: needed,
            num_courses,
            distribution: None,
            projected_cpa: current_cpa,
        };
    }

    let remaining_f = f64::from(remaining);
    let max_points = remaining_f * A_PLUS_POINTS;
    if needed > max_points {
        return PlanningResult {
            status: PlanStatus::Infeasible,
            remaining_credits: remaining,
            needed_points: needed,
            num_courses,
            distribution: None,
            projected_cpa: (goal.current_points + max_points) / total,
        };
    }

    let floor_points = goal.ability_points();
    let min_points = remaining_f * floor_points;
    if needed <= min_points {
        // The minimal-effort plan suffices: everything at the floor.
        return PlanningResult {
            status: PlanStatus::Met,
            remaining_credits: remaining,
            needed_points: needed,
            num_courses,
            distribution: Some(GradeDistribution {
                at_floor: num_courses,
                at_a: 0,
                at_a_plus: 0,
                achieved_points: min_points,
            }),
            projected_cpa: (goal.current_points + min_points) / total,
        };
    }

    if let Some(distribution) = exact_search(remaining, cpc, num_courses, floor_points, needed) {
        let projected_cpa = (goal.current_points + distribution.achieved_points) / total;
        return PlanningResult {
            status: PlanStatus::Met,
            remaining_credits: remaining,
            needed_points: needed,
            num_courses,
            distribution: Some(distribution),
            projected_cpa,
        };
    }

    let distribution = nearest_fit(remaining, cpc, floor_points, needed);
    let projected_cpa = (goal.current_points + distribution.achieved_points) / total;
    PlanningResult {
        status: PlanStatus::Approximate,
        remaining_credits: remaining,
        needed_points: needed,
        num_courses,
        distribution: Some(distribution),
        projected_cpa,
    }
}

/// Exact search over uniform-course splits.
///
/// Floor counts descend from `num_courses` (maximal floor usage first); for
/// each, the above-floor courses split between A and A+ with A preferred. A
/// combination matches when per-tier credits (count x credits-per-course)
/// exactly cover the remaining credits and aggregate points land within
/// tolerance of the requirement. First match wins.
fn exact_search(
    remaining: u32,
    cpc: u32,
    num_courses: u32,
    floor_points: f64,
    needed: f64,
) -> Option<GradeDistribution> {
    for n_floor in (0..=num_courses).rev() {
        let floor_credits = n_floor * cpc;
        if floor_credits > remaining {
            continue;
        }
        let high_credits = remaining - floor_credits;
        let floor_pts = floor_points * f64::from(floor_credits);

        if high_credits == 0 {
            if (floor_pts - needed).abs() <= POINT_TOLERANCE {
                return Some(GradeDistribution {
                    at_floor: n_floor,
                    at_a: 0,
                    at_a_plus: 0,
                    achieved_points: floor_pts,
                });
            }
            continue;
        }

        // Uniform courses cannot cover a non-divisible credit remainder.
        if high_credits % cpc != 0 {
            continue;
        }
        let n_high = high_credits / cpc;

        for n_a in (0..=n_high).rev() {
            let n_ap = n_high - n_a;
            let points = floor_pts
                + A_POINTS * f64::from(n_a * cpc)
                + A_PLUS_POINTS * f64::from(n_ap * cpc);
            if (points - needed).abs() <= POINT_TOLERANCE {
                return Some(GradeDistribution {
                    at_floor: n_floor,
                    at_a: n_a,
                    at_a_plus: n_ap,
                    achieved_points: points,
                });
            }
        }
    }

    None
}

/// Deterministic nearest-fit fallback for goals with no exact uniform-course
/// solution.
///
/// Takes the largest floor count whose all-A+ remainder can still cover the
/// requirement, then upgrades the minimal number of above-floor courses from
/// A to A+. The last above-floor course absorbs the credit remainder;
/// upgrades apply to full-credit courses first. The result can overshoot but
/// never falls short of the requirement by more than the tolerance.
fn nearest_fit(remaining: u32, cpc: u32, floor_points: f64, needed: f64) -> GradeDistribution {
    let max_floor = remaining / cpc;

    for n_floor in (0..=max_floor).rev() {
        let floor_credits = n_floor * cpc;
        let high_credits = remaining - floor_credits;
        let floor_pts = floor_points * f64::from(floor_credits);

        if floor_pts + A_PLUS_POINTS * f64::from(high_credits) + POINT_TOLERANCE < needed {
            continue;
        }

        let n_high = high_credits.div_ceil(cpc);
        if n_high == 0 {
            return GradeDistribution {
                at_floor: n_floor,
                at_a: 0,
                at_a_plus: 0,
                achieved_points: floor_pts,
            };
        }
        let last_credits = high_credits - (n_high - 1) * cpc;

        for n_ap in 0..=n_high {
            let upgraded_credits = if n_ap < n_high {
                n_ap * cpc
            } else {
                (n_high - 1) * cpc + last_credits
            };
            let achieved = floor_pts
                + A_POINTS * f64::from(high_credits)
                + (A_PLUS_POINTS - A_POINTS) * f64::from(upgraded_credits);
            if achieved + POINT_TOLERANCE >= needed {
                return GradeDistribution {
                    at_floor: n_floor,
                    at_a: n_high - n_ap,
                    at_a_plus: n_ap,
                    achieved_points: achieved,
                };
            }
        }
    }

    // Unreachable in practice: with no floor courses and everything at A+,
    // the achieved points equal the step-4 ceiling that already covered the
    // requirement.
    GradeDistribution {
        at_floor: 0,
        at_a: 0,
        at_a_plus: remaining.div_ceil(cpc),
        achieved_points: A_PLUS_POINTS * f64::from(remaining),
    }
}

/// Current standing aggregated from a transcript, as the planner consumes it.
///
/// Exempt subjects and subjects without an overall score yet are skipped;
/// failed subjects are counted separately and contribute no credits or
/// points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CurrentStanding {
    /// Credits of completed, passed, non-exempt subjects
    pub completed_credits: u32,
    /// Sum of `scale4(overall) * credit` over those subjects
    pub total_points: f64,
    /// Number of completed, passed, non-exempt subjects
    pub completed_subjects: usize,
    /// Number of failed subjects
    pub failed_subjects: usize,
}

impl CurrentStanding {
    /// Aggregate a transcript into the planner's current standing.
    #[must_use]
    pub fn from_records(records: &[ScoreRecord]) -> Self {
        let mut standing = Self::default();

        for record in records {
            if record.exempt() || record.overall() <= 0.0 {
                continue;
            }
            if record.is_failed() {
                standing.failed_subjects += 1;
            } else {
                standing.completed_subjects += 1;
                standing.completed_credits += record.credit;
                standing.total_points +=
                    grading::scale4(record.overall()) * f64::from(record.credit);
            }
        }

        standing
    }

    /// Current average over the completed credits (0.0 when none).
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.completed_credits > 0 {
            self.total_points / f64::from(self.completed_credits)
        } else {
            0.0
        }
    }

    /// Build a planning goal from this standing.
    #[must_use]
    pub const fn to_goal(
        &self,
        total_credits_target: u32,
        target_cpa: f64,
        credits_per_course: u32,
        ability_floor: usize,
    ) -> PlanningGoal {
        PlanningGoal {
            current_credits: self.completed_credits,
            current_points: self.total_points,
            total_credits_target,
            target_cpa,
            credits_per_course,
            ability_floor,
        }
    }
}
