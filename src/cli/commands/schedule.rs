//! Schedule command handler

use acadplan::core::models::SelectionSet;
use acadplan::core::{roster, schedule};
use logger::{error, info};
use std::path::Path;

/// Run the schedule command: load offerings, select the requested labels in
/// order, and print the resulting timetable.
///
/// A selection attempt that clashes with the current selection is rejected
/// and reported; the selection stays as it was, so later attempts run against
/// the unchanged state.
pub fn run(input_file: &Path, labels: &[String], output_file: Option<&Path>, verbose: bool) {
    let catalog = match roster::load_offerings(input_file) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("Failed to load offerings {}: {err}", input_file.display());
            eprintln!("✗ Failed to load {}: {err}", input_file.display());
            return;
        }
    };

    info!(
        "Offerings loaded: {} ({} sections, {} subjects)",
        input_file.display(),
        catalog.len(),
        catalog.distinct_subjects()
    );

    let mut selection = SelectionSet::new();
    for label in labels {
        let Some(candidate) = catalog.find_by_label(label) else {
            eprintln!("✗ No offering labelled '{label}'");
            continue;
        };

        if verbose && candidate.skipped_dates() > 0 {
            println!(
                "  ({} malformed dates skipped in '{label}')",
                candidate.skipped_dates()
            );
        }

        match schedule::select(&selection, candidate, &catalog) {
            Ok(next) => {
                selection = next;
                println!("✓ Selected: {label}");
            }
            Err(err) => {
                eprintln!("✗ {label} clashes with:");
                for id in &err.conflicting {
                    if let Some(offering) = catalog.get(*id) {
                        eprintln!("  - {}", offering.label);
                    }
                }
            }
        }
    }

    let rows = roster::selection_rows(&selection, &catalog);
    println!(
        "\nSelected {} offering(s), {} meeting(s) total",
        rows.len(),
        rows.iter().map(|r| r.meetings.len()).sum::<usize>()
    );
    for row in &rows {
        println!("{} [{}] {}", row.label, row.section, row.location);
        for meeting in &row.meetings {
            println!("  {}  {}", meeting.date.format("%d/%m/%Y"), meeting.time);
        }
    }

    if let Some(output) = output_file {
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => {
                if let Err(err) = std::fs::write(output, json) {
                    eprintln!("✗ Failed to write {}: {err}", output.display());
                } else {
                    println!("✓ Selection written to: {}", output.display());
                }
            }
            Err(err) => eprintln!("✗ Failed to serialize selection: {err}"),
        }
    }
}
