//! Target command handler (CPA planner)

use acadplan::core::planner::{self, CurrentStanding, PlanStatus, PlanningGoal};
use acadplan::core::roster;
use logger::{error, info};
use std::path::PathBuf;

/// Arguments for the target command.
pub struct TargetArgs {
    /// Optional transcript for the current standing
    pub input_file: Option<PathBuf>,
    /// Total credits of the degree target
    pub total_credits: u32,
    /// Target cumulative average
    pub target_cpa: f64,
    /// Credits per remaining course
    pub credits_per_course: u32,
    /// Ability floor band label
    pub ability: String,
    /// Explicit current credits (wins over the transcript)
    pub current_credits: Option<u32>,
    /// Explicit current points (wins over the transcript)
    pub current_points: Option<f64>,
    /// Optional JSON output path
    pub output: Option<PathBuf>,
}

/// Run the target command: aggregate the current standing and solve for a
/// grade distribution reaching the target CPA.
pub fn run(args: &TargetArgs) {
    let Some(ability_floor) = planner::ability_index(&args.ability) else {
        eprintln!(
            "✗ Unknown ability band '{}'; expected one of D, D+, C, C+, B, B+, A, A+",
            args.ability
        );
        return;
    };

    let standing = match &args.input_file {
        Some(path) => match roster::load_transcript(path) {
            Ok(records) => CurrentStanding::from_records(&records),
            Err(err) => {
                error!("Failed to load transcript {}: {err}", path.display());
                eprintln!("✗ Failed to load {}: {err}", path.display());
                return;
            }
        },
        None => CurrentStanding::default(),
    };

    if args.input_file.is_none() && (args.current_credits.is_none() || args.current_points.is_none())
    {
        eprintln!("✗ Provide a transcript file or both --current-credits and --current-points");
        return;
    }

    let goal = PlanningGoal {
        current_credits: args.current_credits.unwrap_or(standing.completed_credits),
        current_points: args.current_points.unwrap_or(standing.total_points),
        total_credits_target: args.total_credits,
        target_cpa: args.target_cpa,
        credits_per_course: args.credits_per_course,
        ability_floor,
    };

    info!(
        "Planning toward CPA {:.2} over {} credits (currently {:.1} points over {} credits)",
        goal.target_cpa, goal.total_credits_target, goal.current_points, goal.current_credits
    );

    let result = planner::solve(&goal);

    match result.status {
        PlanStatus::AlreadySatisfied => {
            println!("✓ Target already satisfied (current average {:.2})", result.projected_cpa);
        }
        PlanStatus::Infeasible => {
            println!(
                "✗ Unreachable: even straight A+ grades top out at CPA {:.2}",
                result.projected_cpa
            );
        }
        PlanStatus::Met | PlanStatus::Approximate => {
            println!(
                "Remaining: {} credits over {} course(s); {:.1} points needed",
                result.remaining_credits, result.num_courses, result.needed_points
            );
            if let Some(dist) = &result.distribution {
                let floor_label = planner::GRADE_LADDER[goal.ability_floor].label;
                if dist.at_a_plus > 0 {
                    println!("  A+ x {}", dist.at_a_plus);
                }
                if dist.at_a > 0 {
                    println!("  A  x {}", dist.at_a);
                }
                if dist.at_floor > 0 {
                    println!("  {floor_label}  x {}", dist.at_floor);
                }
                println!(
                    "Projected CPA: {:.2}{}",
                    result.projected_cpa,
                    if result.status == PlanStatus::Approximate {
                        " (nearest achievable split)"
                    } else {
                        ""
                    }
                );
            }
        }
    }

    if let Some(output) = &args.output {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                if let Err(err) = std::fs::write(output, json) {
                    eprintln!("✗ Failed to write {}: {err}", output.display());
                } else {
                    println!("✓ Planning result written to: {}", output.display());
                }
            }
            Err(err) => eprintln!("✗ Failed to serialize planning result: {err}"),
        }
    }
}
