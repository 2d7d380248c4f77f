//! Terminal output.
//!
//! - `formatter` - pure string building
//! - this module - printing, with status lines on stderr so stdout can carry JSON

pub mod formatter;

pub use formatter::{
    format_error, format_nothing, format_plan, format_status, format_success,
};

use crate::plan::PlanOutcome;

pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

pub fn display_success(message: &str) {
    eprintln!("{}", format_success(message));
}

pub fn display_status(message: &str) {
    eprintln!("{}", format_status(message));
}

/// Print a planning outcome in human-readable form
pub fn display_outcome(outcome: &PlanOutcome) {
    match outcome {
        PlanOutcome::Planned(plan) => {
            println!("{}", format_plan(plan));
            println!();
            println!("{}", plan.changelog_entry);
        }
        PlanOutcome::NothingToRelease(nothing) => {
            display_status(&format_nothing(nothing));
        }
    }
}

/// Print a planning outcome as pretty JSON
pub fn display_outcome_json(outcome: &PlanOutcome) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}
