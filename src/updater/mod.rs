//! File update staging
//!
//! Turns the current state of a remote file into a [`FileUpdate`] without
//! doing any I/O. The revision marker of an existing file is carried through
//! unchanged so the caller can choose between create and update-in-place and
//! detect concurrent edits.

pub mod splice;

pub use splice::{CargoTomlUpdater, ChangelogUpdater, GenericVersionUpdater};

use crate::error::Result;
use serde::Serialize;
use std::fmt;

/// Opaque token for the last-known state of a remote file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RevisionMarker(String);

impl RevisionMarker {
    pub fn new(marker: impl Into<String>) -> Self {
        RevisionMarker(marker.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file as reported by the repository client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub content: String,
    pub revision: RevisionMarker,
}

impl RemoteFile {
    pub fn new(content: impl Into<String>, revision: impl Into<String>) -> Self {
        RemoteFile {
            content: content.into(),
            revision: RevisionMarker::new(revision),
        }
    }
}

/// A staged edit. No revision means "create", a revision means "update in place".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileUpdate {
    pub path: String,
    pub content: String,
    pub revision: Option<RevisionMarker>,
    pub message: String,
}

impl FileUpdate {
    pub fn is_create(&self) -> bool {
        self.revision.is_none()
    }
}

/// Computes new content for one file
pub trait ContentUpdater {
    fn update_content(&self, path: &str, content: &str) -> Result<String>;
}

/// Stages file updates that share one commit message
#[derive(Debug, Clone)]
pub struct FileStager {
    message: String,
}

impl FileStager {
    pub fn new(message: impl Into<String>) -> Self {
        FileStager {
            message: message.into(),
        }
    }

    /// Stage one file.
    ///
    /// An existing file is rewritten and keeps its revision marker. A missing
    /// file is built from `template` and carries no marker; without a template
    /// it is skipped (`Ok(None)`).
    pub fn stage(
        &self,
        path: &str,
        current: Option<&RemoteFile>,
        template: Option<&str>,
        updater: &dyn ContentUpdater,
    ) -> Result<Option<FileUpdate>> {
        let (source, revision) = match (current, template) {
            (Some(file), _) => (file.content.as_str(), Some(file.revision.clone())),
            (None, Some(template)) => (template, None),
            (None, None) => return Ok(None),
        };

        let content = updater.update_content(path, source)?;
        Ok(Some(FileUpdate {
            path: path.to_string(),
            content,
            revision,
            message: self.message.clone(),
        }))
    }
}
