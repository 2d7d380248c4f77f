//! Decode boundary for hosting-platform payloads
//!
//! Every field of a raw response is optional. Defaults are applied here and
//! nowhere else:
//!
//! - missing `default_branch` becomes [`DEFAULT_BRANCH`]
//! - missing commit message becomes an empty string
//! - missing `parents` becomes an empty list
//! - tags and commits without a name or sha are dropped
//!
//! File content is expected as plain text.

use crate::client::{PullRequest, RemoteTag};
use crate::domain::RawCommit;
use crate::error::{ReleaseError, Result};
use crate::updater::RemoteFile;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Branch name used when the platform does not report one
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Default, Deserialize)]
pub struct WireRepository {
    pub default_branch: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireObjectRef {
    pub sha: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireTag {
    pub name: Option<String>,
    pub commit: Option<WireObjectRef>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireCommitDetail {
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireCommit {
    pub sha: Option<String>,
    pub commit: Option<WireCommitDetail>,
    pub parents: Option<Vec<WireObjectRef>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireContent {
    pub content: Option<String>,
    pub sha: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WirePullRequest {
    pub number: Option<u64>,
    pub html_url: Option<String>,
}

/// A whole repository state in one document, used for fixtures
#[derive(Debug, Default, Deserialize)]
pub struct WireFixture {
    pub repository: Option<WireRepository>,
    pub tags: Option<Vec<WireTag>>,
    pub commits: Option<Vec<WireCommit>>,
    pub files: Option<BTreeMap<String, WireContent>>,
}

impl WireRepository {
    pub fn into_default_branch(self) -> String {
        self.default_branch
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string())
    }
}

impl WireTag {
    pub fn into_tag(self) -> Option<RemoteTag> {
        let sha = self.commit.and_then(|c| c.sha);
        match (self.name, sha) {
            (Some(name), Some(sha)) => Some(RemoteTag { name, sha }),
            (name, _) => {
                tracing::debug!("Dropping tag payload without name or sha: {:?}", name);
                None
            }
        }
    }
}

impl WireCommit {
    pub fn into_commit(self) -> Option<RawCommit> {
        let Some(sha) = self.sha else {
            tracing::debug!("Dropping commit payload without sha");
            return None;
        };
        let message = self.commit.and_then(|c| c.message).unwrap_or_default();
        let parents = self
            .parents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.sha)
            .collect();
        Some(RawCommit::new(sha, message, parents))
    }
}

impl WireContent {
    pub fn into_file(self, path: &str) -> Result<RemoteFile> {
        let revision = self.sha.ok_or_else(|| {
            ReleaseError::decode(format!("content payload for '{}' has no sha", path))
        })?;
        Ok(RemoteFile::new(self.content.unwrap_or_default(), revision))
    }
}

impl WirePullRequest {
    pub fn into_pull_request(self) -> Result<PullRequest> {
        let number = self
            .number
            .ok_or_else(|| ReleaseError::decode("pull request payload has no number"))?;
        Ok(PullRequest {
            number,
            url: self.html_url.unwrap_or_default(),
        })
    }
}

pub fn decode_default_branch(json: &str) -> Result<String> {
    let repository: WireRepository = serde_json::from_str(json)?;
    Ok(repository.into_default_branch())
}

pub fn decode_tags(json: &str) -> Result<Vec<RemoteTag>> {
    let tags: Vec<WireTag> = serde_json::from_str(json)?;
    Ok(tags.into_iter().filter_map(WireTag::into_tag).collect())
}

pub fn decode_commits(json: &str) -> Result<Vec<RawCommit>> {
    let commits: Vec<WireCommit> = serde_json::from_str(json)?;
    Ok(commits
        .into_iter()
        .filter_map(WireCommit::into_commit)
        .collect())
}

pub fn decode_file(path: &str, json: &str) -> Result<RemoteFile> {
    let content: WireContent = serde_json::from_str(json)?;
    content.into_file(path)
}

pub fn decode_pull_request(json: &str) -> Result<PullRequest> {
    let pull: WirePullRequest = serde_json::from_str(json)?;
    pull.into_pull_request()
}
