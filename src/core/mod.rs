//! Core module for the planning engine

pub mod config;
pub mod grading;
pub mod models;
pub mod planner;
pub mod roster;
pub mod schedule;

/// Returns the current version of the `acadplan` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
