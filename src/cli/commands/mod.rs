//! CLI command handlers

pub mod config;
pub mod schedule;
pub mod scores;
pub mod target;
