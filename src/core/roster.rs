//! Boundary data contracts: raw backend payloads in, plain structured
//! results out.
//!
//! The engine does not care how the raw data arrived (plaintext response or a
//! decrypted payload); it consumes the JSON shapes the backend emits and
//! produces serializable rows for the caller to transmit or persist.

use crate::core::grading::LetterGrade;
use crate::core::models::{OfferingCatalog, ScoreRecord, SelectionSet};
use crate::core::schedule::timetable;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

/// Raw subject record as transported by the backend (camelCase keys).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawScoreRecord {
    /// Subject name
    pub subject_name: String,
    /// Credit count
    pub subject_credit: u32,
    /// First in-term component score
    pub score_first: f64,
    /// Second in-term component score
    pub score_second: f64,
    /// Final exam score
    pub score_final: f64,
    /// Precomputed overall, when the backend supplies one
    pub score_overall: Option<f64>,
    /// Transported letter grade; the engine re-derives it from the overall
    pub score_text: Option<String>,
    /// Student-controlled inclusion in the GPA average
    pub is_selected: bool,
    /// Server-side record id (absent for locally added drafts)
    pub item_id: Option<i64>,
}

/// Schedule detail block of a raw offering record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOfferingDetails {
    /// Full label including the section class code
    pub course_name: String,
    /// Backend course code
    pub course_code: String,
    /// Teacher name
    pub teacher: String,
    /// Study location
    pub study_location: String,
    /// Whitespace-separated dd/mm/yyyy meeting dates
    pub study_days: String,
    /// Whitespace-separated period groups
    pub lessons: String,
}

/// Raw offering record as transported by the backend (snake_case keys).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOffering {
    /// Cohort key (e.g. "AT22")
    pub course: String,
    /// Base time string as sent by the backend
    pub base_time: String,
    /// Display subject name (no class code); the uniqueness key
    pub course_name: String,
    /// Schedule details; absent for offerings without a published schedule
    pub details: Option<RawOfferingDetails>,
}

/// Parse a transcript JSON array into score records.
///
/// A transported overall above zero is honoured; otherwise the overall is
/// computed from the component scores. The letter grade is always re-derived
/// from the overall.
///
/// # Errors
///
/// Returns an error if the JSON cannot be parsed.
pub fn parse_transcript(json: &str) -> Result<Vec<ScoreRecord>, Box<dyn Error>> {
    let raw: Vec<RawScoreRecord> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(score_record_from_raw).collect())
}

/// Load a transcript JSON file into score records.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_transcript<P: AsRef<Path>>(path: P) -> Result<Vec<ScoreRecord>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    parse_transcript(&content)
}

fn score_record_from_raw(raw: RawScoreRecord) -> ScoreRecord {
    match raw.score_overall {
        Some(overall) if overall > 0.0 => ScoreRecord::with_overall(
            raw.subject_name,
            raw.subject_credit,
            raw.score_first,
            raw.score_second,
            raw.score_final,
            overall,
            raw.is_selected,
        ),
        _ => ScoreRecord::new(
            raw.subject_name,
            raw.subject_credit,
            raw.score_first,
            raw.score_second,
            raw.score_final,
            raw.is_selected,
        ),
    }
}

/// Parse an offerings JSON array into a catalog.
///
/// Offerings without a details block still enter the catalog with empty
/// patterns; they expand to zero slots.
///
/// # Errors
///
/// Returns an error if the JSON cannot be parsed.
pub fn parse_offerings(json: &str) -> Result<OfferingCatalog, Box<dyn Error>> {
    let raw: Vec<RawOffering> = serde_json::from_str(json)?;
    let mut catalog = OfferingCatalog::new();

    for offering in raw {
        let details = offering.details.unwrap_or_default();
        let label = if details.course_name.is_empty() {
            offering.course_name.clone()
        } else {
            details.course_name
        };
        catalog.add(
            offering.course_name,
            label,
            details.study_days,
            details.lessons,
            details.teacher,
            details.study_location,
        );
    }

    Ok(catalog)
}

/// Load an offerings JSON file into a catalog.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_offerings<P: AsRef<Path>>(path: P) -> Result<OfferingCatalog, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    parse_offerings(&content)
}

/// One computed score row, ready for the caller to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    /// Subject name
    pub subject: String,
    /// Credit count
    pub credit: u32,
    /// First in-term component score
    pub c1: f64,
    /// Second in-term component score
    pub c2: f64,
    /// Final exam score
    pub c_final: f64,
    /// Derived overall score
    pub overall: f64,
    /// Derived letter grade
    pub letter: LetterGrade,
    /// Failed under the final-exam-floor rule
    pub failed: bool,
    /// Credit-bearing but excluded from averages
    pub exempt: bool,
    /// Student-controlled inclusion in the GPA average
    pub counts_toward_average: bool,
}

impl From<&ScoreRecord> for ScoreRow {
    fn from(record: &ScoreRecord) -> Self {
        Self {
            subject: record.subject.clone(),
            credit: record.credit,
            c1: record.c1(),
            c2: record.c2(),
            c_final: record.c_final(),
            overall: record.overall(),
            letter: record.letter(),
            failed: record.is_failed(),
            exempt: record.exempt(),
            counts_toward_average: record.counts_toward_average,
        }
    }
}

/// Computed rows for a whole transcript.
#[must_use]
pub fn score_rows(records: &[ScoreRecord]) -> Vec<ScoreRow> {
    records.iter().map(ScoreRow::from).collect()
}

/// One meeting of a selected offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingRow {
    /// Meeting date (ISO formatting via chrono)
    pub date: chrono::NaiveDate,
    /// Raw period group
    pub periods: String,
    /// Wall-clock range, or the raw group when unknown
    pub time: String,
}

/// One selected offering with its expanded meetings, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionRow {
    /// Subject key
    pub subject: String,
    /// Full offering label
    pub label: String,
    /// Section code extracted from the label ("Lxx", possibly empty)
    pub section: String,
    /// Teacher name
    pub teacher: String,
    /// Study location
    pub location: String,
    /// Expanded meetings in pattern order
    pub meetings: Vec<MeetingRow>,
}

/// Export the current selection as plain structured rows.
#[must_use]
pub fn selection_rows(selection: &SelectionSet, catalog: &OfferingCatalog) -> Vec<SelectionRow> {
    selection
        .ids()
        .iter()
        .filter_map(|&id| catalog.get(id))
        .map(|offering| SelectionRow {
            subject: offering.subject.clone(),
            label: offering.label.clone(),
            section: offering.section_code(),
            teacher: offering.teacher.clone(),
            location: offering.location.clone(),
            meetings: offering
                .slots()
                .iter()
                .map(|slot| MeetingRow {
                    date: slot.date,
                    periods: slot.period_group.clone(),
                    time: timetable::time_range_label(&slot.period_group),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schedule;

    #[test]
    fn test_parse_transcript_computes_missing_overall() {
        let json = r#"[
            {"subjectName": "Giải tích 1", "subjectCredit": 4,
             "scoreFirst": 8.0, "scoreSecond": 7.0, "scoreFinal": 9.0,
             "isSelected": true},
            {"subjectName": "Triết học", "subjectCredit": 3,
             "scoreFirst": 7.0, "scoreSecond": 8.0, "scoreFinal": 8.0,
             "scoreOverall": 7.9, "scoreText": "B+", "itemId": 12}
        ]"#;

        let records = parse_transcript(json).unwrap();
        assert_eq!(records.len(), 2);

        // Computed: (8*0.7 + 7*0.3)*0.3 + 9*0.7 = 8.61
        assert!((records[0].overall() - 8.61).abs() < 1e-9);
        assert!(records[0].counts_toward_average);

        // Transported overall is honoured; letter re-derived from it.
        assert!((records[1].overall() - 7.9).abs() < f64::EPSILON);
        assert_eq!(records[1].letter(), LetterGrade::BPlus);
        assert!(!records[1].counts_toward_average);
    }

    #[test]
    fn test_parse_offerings_builds_catalog() {
        let json = r#"[
            {"course": "AT22", "course_name": "Toán cao cấp",
             "details": {"course_name": "Toán cao cấp-1-25 (A22C10D904)",
                         "course_code": "TC101",
                         "teacher": "Nguyễn Văn A",
                         "study_location": "301-A2",
                         "study_days": "04/03/2024 11/03/2024",
                         "lessons": "1,2,3 1,2,3"}},
            {"course": "AT22", "course_name": "Tin học đại cương"}
        ]"#;

        let catalog = parse_offerings(json).unwrap();
        assert_eq!(catalog.len(), 2);

        let toan = catalog.get(0).unwrap();
        assert_eq!(toan.subject, "Toán cao cấp");
        assert_eq!(toan.label, "Toán cao cấp-1-25 (A22C10D904)");
        assert_eq!(toan.slots().len(), 2);
        assert_eq!(toan.section_code(), "L04");

        // No details: label falls back to the display name, zero slots.
        let tin = catalog.get(1).unwrap();
        assert_eq!(tin.label, "Tin học đại cương");
        assert!(tin.slots().is_empty());
    }

    #[test]
    fn test_parse_transcript_rejects_malformed_json() {
        assert!(parse_transcript("not json").is_err());
    }

    #[test]
    fn test_score_rows_reflect_derived_state() {
        let records = vec![ScoreRecord::new(
            "Xác suất".to_string(),
            3,
            10.0,
            10.0,
            1.9,
            true,
        )];
        let rows = score_rows(&records);

        assert_eq!(rows.len(), 1);
        assert!(rows[0].failed);
        assert!(!rows[0].exempt);
        assert_eq!(rows[0].credit, 3);
    }

    #[test]
    fn test_selection_rows_include_timetable() {
        let json = r#"[
            {"course": "AT22", "course_name": "Toán cao cấp",
             "details": {"course_name": "Toán cao cấp-1-25 (A22C10D904)",
                         "teacher": "Nguyễn Văn A",
                         "study_location": "301-A2",
                         "study_days": "04/03/2024",
                         "lessons": "1,2,3"}}
        ]"#;
        let catalog = parse_offerings(json).unwrap();
        let selection = schedule::select(
            &SelectionSet::new(),
            catalog.get(0).unwrap(),
            &catalog,
        )
        .unwrap();

        let rows = selection_rows(&selection, &catalog);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].section, "L04");
        assert_eq!(rows[0].meetings.len(), 1);
        assert_eq!(rows[0].meetings[0].time, "07:00 - 09:25");
    }
}
