//! Repository client abstraction layer
//!
//! The planner never talks to a hosting platform. Everything it needs is
//! fetched up front through the [RepositoryClient] trait into a
//! [Snapshot]; publishing an accepted plan goes through [ReleaseWriter].
//!
//! # Overview
//!
//! - [repository::Git2Client]: reads history from a local git repository via `git2`
//! - [mock::MockClient]: in-memory client for tests and JSON fixtures
//! - [wire]: the single decode step for loosely-typed REST payloads
//!
//! ```rust
//! # use release_pr::client::{RepositoryClient, Snapshot};
//! # use release_pr::config::Config;
//! # fn example<C: RepositoryClient>(client: &C) -> release_pr::Result<()> {
//! let snapshot = Snapshot::capture(client, &Config::default())?;
//! println!("{} commits on {}", snapshot.commits.len(), snapshot.target_branch);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;
pub mod snapshot;
pub mod wire;

pub use mock::MockClient;
pub use repository::Git2Client;
pub use snapshot::Snapshot;

use crate::domain::RawCommit;
use crate::error::Result;
use crate::updater::{FileUpdate, RemoteFile, RevisionMarker};
use serde::Serialize;

/// A tag and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteTag {
    pub name: String,
    pub sha: String,
}

impl RemoteTag {
    pub fn new(name: impl Into<String>, sha: impl Into<String>) -> Self {
        RemoteTag {
            name: name.into(),
            sha: sha.into(),
        }
    }
}

/// An opened pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    pub number: u64,
    pub url: String,
}

/// Read access to a hosted repository
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync`; independent fetches may run
/// concurrently on the caller side.
///
/// ## Error Handling
///
/// Transport and authentication failures are returned as
/// [crate::error::ReleaseError::Client] (or `Git` for the local client) and are
/// never retried here. Absence is not an error: a missing file is `Ok(None)`.
pub trait RepositoryClient: Send + Sync {
    /// Name of the repository's default branch
    fn default_branch(&self) -> Result<String>;

    /// Up to `limit` tags, newest first
    fn list_tags(&self, limit: usize) -> Result<Vec<RemoteTag>>;

    /// Up to `limit` commits reachable from `branch`, newest first
    fn list_commits(&self, branch: &str, limit: usize) -> Result<Vec<RawCommit>>;

    /// Content and revision marker of `path` at `git_ref`, or `None` if absent
    fn file_content(&self, path: &str, git_ref: &str) -> Result<Option<RemoteFile>>;
}

/// Write access used by the caller after accepting a plan
///
/// A release branch is rebuilt from its base on every publish, so revision
/// markers read from the base branch stay valid for the writes that follow
/// [ReleaseWriter::reset_branch].
pub trait ReleaseWriter: Send + Sync {
    /// Point `branch` at the tip of `base`, creating it if needed.
    /// Earlier commits on `branch` are discarded.
    fn reset_branch(&self, branch: &str, base: &str) -> Result<()>;

    /// Create (no revision) or update (with revision) a file on `branch`
    fn create_or_update_file(&self, branch: &str, update: &FileUpdate) -> Result<RevisionMarker>;

    /// The open pull request from `head` into `base`, if any
    fn find_open_pull_request(&self, head: &str, base: &str) -> Result<Option<PullRequest>>;

    /// Open a pull request from `head` into `base`
    fn create_pull_request(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<PullRequest>;

    /// Replace the title and body of an open pull request
    fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<PullRequest>;
}
