//! Integration tests for boundary data loading

use acadplan::core::roster;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_transcript_from_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("transcript.json");
    fs::write(
        &path,
        r#"[
            {"subjectName": "Giải tích 1", "subjectCredit": 4,
             "scoreFirst": 8.0, "scoreSecond": 7.0, "scoreFinal": 9.0,
             "isSelected": true, "itemId": 7}
        ]"#,
    )
    .expect("Failed to write transcript");

    let records = roster::load_transcript(&path).expect("transcript should load");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].subject, "Giải tích 1");
    assert!((records[0].overall() - 8.61).abs() < 1e-9);
}

#[test]
fn test_load_offerings_from_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("offerings.json");
    fs::write(
        &path,
        r#"[
            {"course": "AT22", "course_name": "Toán cao cấp",
             "details": {"course_name": "Toán cao cấp-1-25 (A22C10D904)",
                         "teacher": "Nguyễn Văn A",
                         "study_location": "301-A2",
                         "study_days": "04/03/2024",
                         "lessons": "1,2,3"}}
        ]"#,
    )
    .expect("Failed to write offerings");

    let catalog = roster::load_offerings(&path).expect("offerings should load");
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get(0).unwrap().slots().len(), 1);
}

#[test]
fn test_load_nonexistent_file_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing.json");

    assert!(roster::load_transcript(&missing).is_err());
    assert!(roster::load_offerings(&missing).is_err());
}

#[test]
fn test_load_malformed_json_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{not valid json").expect("Failed to write file");

    assert!(roster::load_transcript(&path).is_err());
}

#[test]
fn test_raw_records_round_trip() {
    // The DTOs serialize back to the backend's key names.
    let raw = roster::RawScoreRecord {
        subject_name: "Triết học".to_string(),
        subject_credit: 3,
        score_first: 7.0,
        score_second: 8.0,
        score_final: 8.0,
        score_overall: Some(7.9),
        score_text: Some("B+".to_string()),
        is_selected: true,
        item_id: Some(12),
    };

    let json = serde_json::to_string(&raw).unwrap();
    assert!(json.contains("\"subjectName\""));
    assert!(json.contains("\"isSelected\""));

    let back: roster::RawScoreRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back.subject_name, raw.subject_name);
    assert_eq!(back.item_id, raw.item_id);
}
