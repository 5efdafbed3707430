//! Score record model

use crate::core::grading::{self, LetterGrade};
use serde::{Deserialize, Serialize};

/// Subject-name markers for credit-bearing subjects excluded from averages
/// (physical education), matched case-insensitively the way the backend
/// labels them.
const EXEMPT_MARKERS: [&str; 2] = ["giáo dục thể chất", "gdtt"];

/// One academic subject's grading state.
///
/// The derived `overall`/`letter` pair is kept private and recomputed on every
/// component mutation, so a record can never be observed inconsistent with its
/// component scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Subject name (e.g. "Toán cao cấp 1")
    pub subject: String,

    /// Credit count
    pub credit: u32,

    /// Student-controlled inclusion in the GPA average
    pub counts_toward_average: bool,

    /// First in-term component score (0-10)
    c1: f64,

    /// Second in-term component score (0-10)
    c2: f64,

    /// Final exam score (0-10)
    c_final: f64,

    /// Derived overall score; always consistent with the components
    overall: f64,

    /// Derived letter grade; always consistent with `overall`
    letter: LetterGrade,
}

impl ScoreRecord {
    /// Create a new record, deriving the overall and letter grade from the
    /// component scores.
    #[must_use]
    pub fn new(
        subject: String,
        credit: u32,
        c1: f64,
        c2: f64,
        c_final: f64,
        counts_toward_average: bool,
    ) -> Self {
        let overall = grading::compute_overall(c1, c2, c_final);
        Self {
            subject,
            credit,
            counts_toward_average,
            c1,
            c2,
            c_final,
            overall,
            letter: LetterGrade::from_overall(overall),
        }
    }

    /// Create a record with a precomputed overall (as transported by the
    /// backend). The letter grade is re-derived from the given overall so the
    /// consistency invariant holds regardless of payload content.
    #[must_use]
    pub fn with_overall(
        subject: String,
        credit: u32,
        c1: f64,
        c2: f64,
        c_final: f64,
        overall: f64,
        counts_toward_average: bool,
    ) -> Self {
        Self {
            subject,
            credit,
            counts_toward_average,
            c1,
            c2,
            c_final,
            overall,
            letter: LetterGrade::from_overall(overall),
        }
    }

    /// First in-term component score
    #[must_use]
    pub const fn c1(&self) -> f64 {
        self.c1
    }

    /// Second in-term component score
    #[must_use]
    pub const fn c2(&self) -> f64 {
        self.c2
    }

    /// Final exam score
    #[must_use]
    pub const fn c_final(&self) -> f64 {
        self.c_final
    }

    /// Derived overall score
    #[must_use]
    pub const fn overall(&self) -> f64 {
        self.overall
    }

    /// Derived letter grade
    #[must_use]
    pub const fn letter(&self) -> LetterGrade {
        self.letter
    }

    /// Set the first component score and recompute the derived fields.
    pub fn set_c1(&mut self, c1: f64) {
        self.c1 = c1;
        self.recompute();
    }

    /// Set the second component score and recompute the derived fields.
    pub fn set_c2(&mut self, c2: f64) {
        self.c2 = c2;
        self.recompute();
    }

    /// Set the final exam score and recompute the derived fields.
    pub fn set_c_final(&mut self, c_final: f64) {
        self.c_final = c_final;
        self.recompute();
    }

    /// Replace all three component scores and recompute the derived fields.
    pub fn set_components(&mut self, c1: f64, c2: f64, c_final: f64) {
        self.c1 = c1;
        self.c2 = c2;
        self.c_final = c_final;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.overall = grading::compute_overall(self.c1, self.c2, self.c_final);
        self.letter = LetterGrade::from_overall(self.overall);
    }

    /// Whether this subject carries credit but is excluded from averages
    /// (physical education).
    #[must_use]
    pub fn exempt(&self) -> bool {
        let name = self.subject.to_lowercase();
        EXEMPT_MARKERS.iter().any(|marker| name.contains(marker))
    }

    /// Whether this subject is failed under the final-exam-floor rule.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        grading::is_failed(self.c_final, self.overall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation_derives_fields() {
        let record = ScoreRecord::new("Giải tích 1".to_string(), 4, 8.0, 7.0, 9.0, true);

        assert_eq!(record.subject, "Giải tích 1");
        assert_eq!(record.credit, 4);
        assert!((record.overall() - 8.61).abs() < 1e-9);
        assert_eq!(record.letter(), LetterGrade::A);
        assert!(!record.is_failed());
    }

    #[test]
    fn test_mutation_recomputes_derived_fields() {
        let mut record = ScoreRecord::new("Vật lý 1".to_string(), 3, 8.0, 8.0, 8.0, true);
        assert_eq!(record.letter(), LetterGrade::BPlus);

        record.set_c_final(2.0);
        // component = 8.0; overall = 2.4 + 1.4 = 3.8
        assert!((record.overall() - 3.8).abs() < 1e-9);
        assert_eq!(record.letter(), LetterGrade::F);
        assert!(record.is_failed());
    }

    #[test]
    fn test_set_components_recomputes_once() {
        let mut record = ScoreRecord::new("Hóa học".to_string(), 2, 0.0, 0.0, 0.0, true);
        record.set_components(9.0, 9.0, 9.5);
        assert_eq!(record.letter(), LetterGrade::APlus);
    }

    #[test]
    fn test_with_overall_keeps_given_overall() {
        let record =
            ScoreRecord::with_overall("Triết học".to_string(), 3, 7.0, 8.0, 8.0, 7.9, true);
        assert!((record.overall() - 7.9).abs() < f64::EPSILON);
        assert_eq!(record.letter(), LetterGrade::BPlus);
    }

    #[test]
    fn test_exempt_detection() {
        let pe = ScoreRecord::new("Giáo dục thể chất 2".to_string(), 1, 8.0, 8.0, 8.0, true);
        let pe_abbrev = ScoreRecord::new("GDTT 1".to_string(), 1, 8.0, 8.0, 8.0, true);
        let regular = ScoreRecord::new("Lập trình C".to_string(), 3, 8.0, 8.0, 8.0, true);

        assert!(pe.exempt());
        assert!(pe_abbrev.exempt());
        assert!(!regular.exempt());
    }

    #[test]
    fn test_failed_via_final_exam_floor() {
        // Strong term work, failed final: letter would be high but the record
        // is still failed.
        let record = ScoreRecord::new("Xác suất".to_string(), 3, 10.0, 10.0, 1.9, true);
        assert!(record.is_failed());
    }
}
