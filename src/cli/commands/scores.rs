//! Scores command handler

use acadplan::core::{grading, roster};
use logger::{error, info};
use std::path::Path;

/// Run the scores command: compute derived grades and averages for a
/// transcript file.
///
/// # Arguments
/// * `input_file` - Path to the transcript JSON file
/// * `output_file` - Optional path for the computed rows as JSON
/// * `verbose` - Whether to show per-subject details
pub fn run(input_file: &Path, output_file: Option<&Path>, verbose: bool) {
    let records = match roster::load_transcript(input_file) {
        Ok(records) => records,
        Err(err) => {
            error!("Failed to load transcript {}: {err}", input_file.display());
            eprintln!("✗ Failed to load {}: {err}", input_file.display());
            return;
        }
    };

    info!(
        "Transcript loaded: {} ({} subjects)",
        input_file.display(),
        records.len()
    );

    let rows = roster::score_rows(&records);
    if verbose {
        for row in &rows {
            let marker = if row.failed {
                "  [FAILED]"
            } else if row.exempt {
                "  [exempt]"
            } else {
                ""
            };
            println!(
                "{} ({} cr): {:.2}/{:.2}/{:.2} -> {:.2} {}{marker}",
                row.subject, row.credit, row.c1, row.c2, row.c_final, row.overall, row.letter
            );
        }
    }

    let failed = rows.iter().filter(|r| r.failed).count();
    println!("Subjects: {} ({} failed)", rows.len(), failed);
    println!("GPA: {:.2}", grading::gpa(&records));
    println!("CPA: {:.2}", grading::cpa(&records));

    if let Some(output) = output_file {
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => {
                if let Err(err) = std::fs::write(output, json) {
                    eprintln!("✗ Failed to write {}: {err}", output.display());
                } else {
                    println!("✓ Computed scores written to: {}", output.display());
                }
            }
            Err(err) => eprintln!("✗ Failed to serialize scores: {err}"),
        }
    }
}
