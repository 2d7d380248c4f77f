//! Release workflow orchestration
//!
//! Ties the pieces together on the caller side: capture a snapshot through a
//! repository client, plan against it, and publish an accepted plan through
//! a writer. The binary only plans ([plan_release]) since the local git
//! client has no write access; [run_release_workflow] needs a client that
//! also implements [ReleaseWriter].

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::client::{PullRequest, ReleaseWriter, RepositoryClient, Snapshot};
use crate::config::Config;
use crate::observer::ReleaseObserver;
use crate::plan::{PlanOutcome, ReleasePlan, ReleasePlanner};
use crate::updater::RevisionMarker;

/// Arguments for the release workflow
///
/// Decoupled from the clap arguments so the workflow can be called
/// programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Date printed in the changelog heading
    pub date: NaiveDate,

    /// Plan only; nothing is written
    pub dry_run: bool,
}

/// What was written for a published plan
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedRelease {
    pub pull_request: PullRequest,

    /// True when an already open pull request was refreshed
    pub updated_existing: bool,

    /// New revision of every written path, in write order
    pub revisions: Vec<(String, RevisionMarker)>,
}

/// Result of one workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub outcome: PlanOutcome,

    /// `None` for dry runs and when there is nothing to release
    pub published: Option<PublishedRelease>,
}

/// Capture, plan and (unless dry-running) publish.
///
/// 1. Capture a snapshot of tags, commits and target files
/// 2. Plan against the snapshot
/// 3. Rebuild the release branch from the target branch
/// 4. Write every staged file to the release branch
/// 5. Open the pull request, or refresh the one already open
///
/// A `NothingToRelease` outcome stops after step 2 without writing anything.
/// Client failures abort the run unchanged.
pub fn run_release_workflow<C>(
    client: &C,
    config: &Config,
    observer: &dyn ReleaseObserver,
    args: &ReleaseWorkflowArgs,
) -> Result<WorkflowResult>
where
    C: RepositoryClient + ReleaseWriter + ?Sized,
{
    let outcome = plan_release(client, config, observer, args.date)?;

    let published = match (&outcome, args.dry_run) {
        (PlanOutcome::Planned(plan), false) => Some(publish_plan(client, plan)?),
        _ => None,
    };

    Ok(WorkflowResult { outcome, published })
}

/// Capture a snapshot and plan against it without writing anything.
///
/// The configuration is validated before the client is read.
pub fn plan_release<C>(
    client: &C,
    config: &Config,
    observer: &dyn ReleaseObserver,
    date: NaiveDate,
) -> Result<PlanOutcome>
where
    C: RepositoryClient + ?Sized,
{
    let planner = ReleasePlanner::new(config, observer)?;
    let snapshot = Snapshot::capture(client, config).context("Failed to read repository state")?;
    Ok(planner.plan(&snapshot, date)?)
}

/// Write a plan's file updates to its head branch and open the pull request.
///
/// Safe to repeat for every push: the head branch is reset to the base first
/// and an open pull request for the same branches is updated in place.
pub fn publish_plan<W>(writer: &W, plan: &ReleasePlan) -> Result<PublishedRelease>
where
    W: ReleaseWriter + ?Sized,
{
    writer
        .reset_branch(&plan.head_branch, &plan.base_branch)
        .with_context(|| format!("Failed to reset {} to {}", plan.head_branch, plan.base_branch))?;

    let mut revisions = Vec::with_capacity(plan.updates.len());
    for update in &plan.updates {
        let revision = writer
            .create_or_update_file(&plan.head_branch, update)
            .with_context(|| format!("Failed to write {} to {}", update.path, plan.head_branch))?;
        tracing::info!("Wrote {} to {}", update.path, plan.head_branch);
        revisions.push((update.path.clone(), revision));
    }

    let existing = writer
        .find_open_pull_request(&plan.head_branch, &plan.base_branch)
        .context("Failed to look up the release pull request")?;
    let (pull_request, updated_existing) = match existing {
        Some(open) => {
            let pull_request = writer
                .update_pull_request(open.number, &plan.pr_title, &plan.pr_body)
                .with_context(|| format!("Failed to update pull request #{}", open.number))?;
            tracing::info!("Updated pull request #{}", pull_request.number);
            (pull_request, true)
        }
        None => {
            let pull_request = writer
                .create_pull_request(
                    &plan.pr_title,
                    &plan.pr_body,
                    &plan.head_branch,
                    &plan.base_branch,
                )
                .context("Failed to open the release pull request")?;
            tracing::info!("Opened pull request #{}", pull_request.number);
            (pull_request, false)
        }
    };

    Ok(PublishedRelease {
        pull_request,
        updated_existing,
        revisions,
    })
}
