use crate::domain::RawCommit;
use std::fmt;

/// Warnings that occur while locating the previous release in history.
/// These are non-fatal issues reported through the injected observer.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Tag exists but cannot be parsed as a release tag
    UnparsableTag { tag: String, reason: String },
    /// The previous release commit is outside the fetched history window
    BoundaryNotFound {
        tag: String,
        sha: String,
        searched: usize,
    },
    /// The previous release tag points at the branch head
    NoNewCommits { tag: String },
    /// A commit message does not follow the conventional format
    NonConventionalCommit { sha: String, header: String },
    /// A configured extra file is absent and has no template
    MissingFile { path: String },
}

impl BoundaryWarning {
    /// Whether the event is routine detail rather than something to act on
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, BoundaryWarning::NonConventionalCommit { .. })
    }
}

fn short(hash: &str) -> &str {
    match hash.char_indices().nth(7) {
        Some((i, _)) => &hash[..i],
        None => hash,
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::BoundaryNotFound { tag, sha, searched } => {
                write!(
                    f,
                    "Commit {} of tag '{}' not found in the last {} commits; treating as initial release",
                    short(sha),
                    tag,
                    searched
                )
            }
            BoundaryWarning::NoNewCommits { tag } => {
                write!(f, "No commits since '{}'", tag)
            }
            BoundaryWarning::NonConventionalCommit { sha, header } => {
                write!(f, "Skipping non-conventional commit {}: {}", short(sha), header)
            }
            BoundaryWarning::MissingFile { path } => {
                write!(f, "File '{}' does not exist and has no template; skipped", path)
            }
        }
    }
}

/// Commits eligible for a release, as cut from newest-first history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWindow<'a> {
    /// No previous release: the whole fetched list is eligible
    Initial(&'a [RawCommit]),
    /// Commits strictly newer than the boundary commit
    SinceBoundary(&'a [RawCommit]),
    /// The boundary sha never appeared in the fetched list
    BoundaryMissing,
}

impl<'a> HistoryWindow<'a> {
    /// Cut newest-first `commits` at the boundary commit, excluding it
    pub fn walk(commits: &'a [RawCommit], boundary_sha: Option<&str>) -> Self {
        let Some(boundary) = boundary_sha else {
            return HistoryWindow::Initial(commits);
        };

        match commits.iter().position(|c| c.sha == boundary) {
            Some(index) => HistoryWindow::SinceBoundary(&commits[..index]),
            None => HistoryWindow::BoundaryMissing,
        }
    }

    /// Eligible commits, or `None` when the boundary was not found
    pub fn commits(&self) -> Option<&'a [RawCommit]> {
        match self {
            HistoryWindow::Initial(commits) | HistoryWindow::SinceBoundary(commits) => {
                Some(commits)
            }
            HistoryWindow::BoundaryMissing => None,
        }
    }
}
