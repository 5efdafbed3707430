//! Grade computation: overall scores, letter grades, scale-4 conversion,
//! and credit-weighted averages (GPA/CPA).
//!
//! Scores are accepted as given; out-of-range inputs produce out-of-range but
//! well-defined results. Upstream data quality is the caller's concern.

use crate::core::models::ScoreRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A final exam score below this floor fails the subject outright.
pub const FINAL_EXAM_FLOOR: f64 = 2.0;

/// An overall score below this threshold fails the subject.
pub const PASSING_OVERALL: f64 = 4.0;

/// Letter grade on the nine-symbol scale, banded from the overall score.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterGrade {
    /// Overall 9.0 and above
    #[serde(rename = "A+")]
    APlus,
    /// Overall in [8.5, 9.0)
    A,
    /// Overall in [7.8, 8.5)
    #[serde(rename = "B+")]
    BPlus,
    /// Overall in [7.0, 7.8)
    B,
    /// Overall in [6.3, 7.0)
    #[serde(rename = "C+")]
    CPlus,
    /// Overall in [5.5, 6.3)
    C,
    /// Overall in [4.8, 5.5)
    #[serde(rename = "D+")]
    DPlus,
    /// Overall in [4.0, 4.8)
    D,
    /// Overall below 4.0
    F,
}

impl LetterGrade {
    /// Band an overall score (0-10 scale) into a letter grade.
    ///
    /// Bands are half-open and non-overlapping, from high to low:
    /// `[9.0, inf)` A+, `[8.5, 9.0)` A, `[7.8, 8.5)` B+, `[7.0, 7.8)` B,
    /// `[6.3, 7.0)` C+, `[5.5, 6.3)` C, `[4.8, 5.5)` D+, `[4.0, 4.8)` D,
    /// everything below F.
    #[must_use]
    pub fn from_overall(overall: f64) -> Self {
        if overall >= 9.0 {
            Self::APlus
        } else if overall >= 8.5 {
            Self::A
        } else if overall >= 7.8 {
            Self::BPlus
        } else if overall >= 7.0 {
            Self::B
        } else if overall >= 6.3 {
            Self::CPlus
        } else if overall >= 5.5 {
            Self::C
        } else if overall >= 4.8 {
            Self::DPlus
        } else if overall >= 4.0 {
            Self::D
        } else {
            Self::F
        }
    }

    /// The 4.0-scale grade points for this letter.
    ///
    /// Shares its boundaries with [`from_overall`]; the CPA planner reuses
    /// this table for its grade ladder.
    ///
    /// [`from_overall`]: Self::from_overall
    #[must_use]
    pub const fn points(self) -> f64 {
        match self {
            Self::APlus => 4.0,
            Self::A => 3.8,
            Self::BPlus => 3.5,
            Self::B => 3.0,
            Self::CPlus => 2.4,
            Self::C => 2.0,
            Self::DPlus => 1.5,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    /// Display symbol (e.g. "B+").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to 2 decimal places, half-up.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the overall score from the two in-term component scores and the
/// final exam score.
///
/// Formula: `component = c1*0.7 + c2*0.3`, then
/// `overall = round2(component*0.3 + c_final*0.7)`.
///
/// Total over the real domain; never fails.
#[must_use]
pub fn compute_overall(c1: f64, c2: f64, c_final: f64) -> f64 {
    let component = c1 * 0.7 + c2 * 0.3;
    round2(component * 0.3 + c_final * 0.7)
}

/// Convert an overall score (0-10 scale) to 4.0-scale grade points.
#[must_use]
pub fn scale4(overall: f64) -> f64 {
    LetterGrade::from_overall(overall).points()
}

/// Whether a subject is failed.
///
/// Failed iff the final exam score is below 2.0, or the final exam score is at
/// least 2.0 but the overall is below 4.0. The two clauses are distinct rules:
/// a record can carry letter grade "D" yet fail through the final-exam floor.
#[must_use]
pub fn is_failed(c_final: f64, overall: f64) -> bool {
    c_final < FINAL_EXAM_FLOOR || (c_final >= FINAL_EXAM_FLOOR && overall < PASSING_OVERALL)
}

/// Credit-weighted average of scale-4 points over the records matching
/// `include`.
///
/// Returns 0.0 when the matched credit sum is zero; an empty transcript is
/// "no data yet", not an error. Zero-credit records never contribute.
pub fn weighted_average<F>(records: &[ScoreRecord], include: F) -> f64
where
    F: Fn(&ScoreRecord) -> bool,
{
    let mut total_points = 0.0;
    let mut total_credits = 0u32;

    for record in records.iter().filter(|r| include(r)) {
        if record.credit > 0 {
            total_points += scale4(record.overall()) * f64::from(record.credit);
            total_credits += record.credit;
        }
    }

    if total_credits > 0 {
        total_points / f64::from(total_credits)
    } else {
        0.0
    }
}

/// GPA: weighted average over the subjects the student has marked as counting
/// (recent-term selection), excluding exempt subjects.
#[must_use]
pub fn gpa(records: &[ScoreRecord]) -> f64 {
    weighted_average(records, |r| r.counts_toward_average && !r.exempt())
}

/// CPA: weighted average over all completed, non-exempt subjects.
#[must_use]
pub fn cpa(records: &[ScoreRecord]) -> f64 {
    weighted_average(records, |r| r.overall() > 0.0 && !r.exempt())
}
