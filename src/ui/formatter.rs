//! Pure formatting functions for UI output.
//!
//! Everything here builds strings; printing happens in the parent module.
//! Styling goes through `console`, which drops colors when the output is not
//! a terminal.

use console::style;

use crate::plan::{NothingToRelease, ReleasePlan};
use crate::updater::FileUpdate;

const MAX_LISTED_COMMITS: usize = 10;
const MAX_SUBJECT_WIDTH: usize = 60;

pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red(), message)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

/// Cut a subject to the display width on a character boundary
fn truncate(subject: &str) -> String {
    match subject.char_indices().nth(MAX_SUBJECT_WIDTH) {
        Some((i, _)) => format!("{}…", &subject[..i]),
        None => subject.to_string(),
    }
}

fn format_update(update: &FileUpdate) -> String {
    let action = if update.is_create() {
        style("create").green()
    } else {
        style("update").cyan()
    };
    format!("  {} {}", action, update.path)
}

/// Summary of a plan: tag change, commits, staged files and the PR
pub fn format_plan(plan: &ReleasePlan) -> String {
    let mut lines = Vec::new();

    match &plan.previous_tag {
        Some(previous) => {
            lines.push(style("Proposed Release:").bold().to_string());
            lines.push(format!("  From: {}", style(previous).red()));
            lines.push(format!("  To:   {}", style(&plan.current_tag).green()));
        }
        None => {
            lines.push(style("Initial Release:").bold().to_string());
            lines.push(format!("  New tag: {}", style(&plan.current_tag).green()));
        }
    }

    lines.push(String::new());
    lines.push(
        style(format!("{} commits since the last release:", plan.commits.len()))
            .underlined()
            .to_string(),
    );
    for (i, commit) in plan.commits.iter().take(MAX_LISTED_COMMITS).enumerate() {
        let marker = if commit.breaking { "!" } else { "" };
        lines.push(format!(
            "  {}. {} {}{}: {}",
            i + 1,
            style(commit.short_sha()).dim(),
            commit.commit_type,
            marker,
            truncate(&commit.subject)
        ));
    }
    if plan.commits.len() > MAX_LISTED_COMMITS {
        lines.push(format!(
            "  ... and {} more commits",
            plan.commits.len() - MAX_LISTED_COMMITS
        ));
    }

    lines.push(String::new());
    lines.push(style("Files:").bold().to_string());
    lines.extend(plan.updates.iter().map(format_update));

    lines.push(String::new());
    lines.push(style("Pull Request:").bold().to_string());
    lines.push(format!("  {}", plan.pr_title));
    lines.push(format!("  {} → {}", style(&plan.head_branch).cyan(), plan.base_branch));

    lines.join("\n")
}

pub fn format_nothing(nothing: &NothingToRelease) -> String {
    match &nothing.previous_tag {
        Some(tag) => format!("Nothing to release after {}: {}", tag, nothing.reason),
        None => format!("Nothing to release: {}", nothing.reason),
    }
}
