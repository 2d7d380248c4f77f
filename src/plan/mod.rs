//! Release plan assembly
//!
//! [`ReleasePlanner`] turns a captured [`Snapshot`](crate::client::Snapshot)
//! into a [`PlanOutcome`]: either a complete [`ReleasePlan`] or a
//! [`NothingToRelease`] record explaining why no release is due. The outcome
//! is a plain value; publishing it is up to the caller.

pub mod assembler;
pub mod pull_request;

pub use assembler::ReleasePlanner;
pub use pull_request::{render_body, render_title};

use crate::domain::{ClassifiedCommit, TagName, Version};
use crate::updater::FileUpdate;
use serde::Serialize;
use std::fmt;

/// Everything needed to open or refresh a release pull request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleasePlan {
    pub version: Version,
    pub previous_tag: Option<TagName>,
    pub current_tag: TagName,
    pub changelog_entry: String,
    pub pr_title: String,
    pub pr_body: String,
    pub head_branch: String,
    pub base_branch: String,
    /// Changelog first, paths unique
    pub updates: Vec<FileUpdate>,
    /// Conventional commits since the previous release, newest first
    pub commits: Vec<ClassifiedCommit>,
}

/// Why a run produced no plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NothingReason {
    /// The previous release is the branch head
    NoNewCommits,
    /// New commits exist but none follow the conventional format
    NoConventionalCommits,
    /// Conventional commits exist but none warrant a version bump
    NoReleasableChanges,
}

impl fmt::Display for NothingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NothingReason::NoNewCommits => "no commits since the last release",
            NothingReason::NoConventionalCommits => "no conventional commits since the last release",
            NothingReason::NoReleasableChanges => "no releasable changes since the last release",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NothingToRelease {
    pub reason: NothingReason,
    pub previous_tag: Option<TagName>,
}

/// Result of one planning run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlanOutcome {
    Planned(ReleasePlan),
    NothingToRelease(NothingToRelease),
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&ReleasePlan> {
        match self {
            PlanOutcome::Planned(plan) => Some(plan),
            PlanOutcome::NothingToRelease(_) => None,
        }
    }

    pub fn is_planned(&self) -> bool {
        self.plan().is_some()
    }
}
