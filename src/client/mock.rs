use crate::client::wire::WireFixture;
use crate::client::{PullRequest, ReleaseWriter, RemoteTag, RepositoryClient};
use crate::domain::RawCommit;
use crate::error::{ReleaseError, Result};
use crate::updater::{FileUpdate, RemoteFile, RevisionMarker};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// A pull request opened through [`MockClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPullRequest {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

/// In-memory repository for tests and offline planning.
///
/// Tags and commits are kept in the order they are added, which callers use
/// as newest first. Files added with [`MockClient::add_file`] are visible on
/// every ref; files written through [`ReleaseWriter`] only on their branch.
#[derive(Debug, Default)]
pub struct MockClient {
    default_branch: String,
    tags: Vec<RemoteTag>,
    commits: Vec<RawCommit>,
    files: BTreeMap<String, RemoteFile>,
    failure: Option<String>,
    written: Mutex<Vec<(String, FileUpdate)>>,
    branch_files: Mutex<BTreeMap<(String, String), RemoteFile>>,
    pull_requests: Mutex<Vec<RecordedPullRequest>>,
}

impl MockClient {
    /// Create an empty repository with the given default branch
    pub fn new(default_branch: impl Into<String>) -> Self {
        MockClient {
            default_branch: default_branch.into(),
            ..Default::default()
        }
    }

    /// Build a repository from a JSON fixture in platform payload shape
    pub fn from_fixture(json: &str) -> Result<Self> {
        let fixture: WireFixture = serde_json::from_str(json)?;
        let mut client = MockClient::new(fixture.repository.unwrap_or_default().into_default_branch());

        client.tags = fixture
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(|t| t.into_tag())
            .collect();
        client.commits = fixture
            .commits
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.into_commit())
            .collect();
        for (path, content) in fixture.files.unwrap_or_default() {
            let file = content.into_file(&path)?;
            client.files.insert(path, file);
        }

        Ok(client)
    }

    pub fn add_tag(&mut self, name: impl Into<String>, sha: impl Into<String>) {
        self.tags.push(RemoteTag::new(name, sha));
    }

    pub fn add_commit(&mut self, sha: &str, message: &str, parents: &[&str]) {
        self.commits.push(RawCommit::new(
            sha,
            message,
            parents.iter().map(|p| p.to_string()).collect(),
        ));
    }

    pub fn add_file(&mut self, path: impl Into<String>, content: &str, revision: &str) {
        self.files
            .insert(path.into(), RemoteFile::new(content, revision));
    }

    /// Make every call fail with a client error
    pub fn fail_with(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
    }

    /// Files written so far, with the branch they were written to
    pub fn written_files(&self) -> Vec<(String, FileUpdate)> {
        self.written.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn pull_requests(&self) -> Vec<RecordedPullRequest> {
        self.pull_requests
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(ReleaseError::client(message.clone())),
            None => Ok(()),
        }
    }

    fn pull_request(number: u64) -> PullRequest {
        PullRequest {
            number,
            url: format!("https://example.invalid/pull/{}", number),
        }
    }

    fn lock_error() -> ReleaseError {
        ReleaseError::client("mock client state poisoned")
    }
}

impl RepositoryClient for MockClient {
    fn default_branch(&self) -> Result<String> {
        self.check()?;
        Ok(self.default_branch.clone())
    }

    fn list_tags(&self, limit: usize) -> Result<Vec<RemoteTag>> {
        self.check()?;
        Ok(self.tags.iter().take(limit).cloned().collect())
    }

    fn list_commits(&self, _branch: &str, limit: usize) -> Result<Vec<RawCommit>> {
        self.check()?;
        Ok(self.commits.iter().take(limit).cloned().collect())
    }

    fn file_content(&self, path: &str, git_ref: &str) -> Result<Option<RemoteFile>> {
        self.check()?;
        let branch_files = self.branch_files.lock().map_err(|_| Self::lock_error())?;
        if let Some(file) = branch_files.get(&(git_ref.to_string(), path.to_string())) {
            return Ok(Some(file.clone()));
        }
        Ok(self.files.get(path).cloned())
    }
}

impl ReleaseWriter for MockClient {
    fn reset_branch(&self, branch: &str, base: &str) -> Result<()> {
        self.check()?;
        let mut branch_files = self.branch_files.lock().map_err(|_| Self::lock_error())?;
        branch_files.retain(|(b, _), _| b != branch);

        let inherited: Vec<_> = branch_files
            .iter()
            .filter(|((b, _), _)| b == base)
            .map(|((_, path), file)| ((branch.to_string(), path.clone()), file.clone()))
            .collect();
        branch_files.extend(inherited);
        Ok(())
    }

    fn create_or_update_file(&self, branch: &str, update: &FileUpdate) -> Result<RevisionMarker> {
        self.check()?;
        let current = self.file_content(&update.path, branch)?;
        match (&current, &update.revision) {
            (Some(_), None) => {
                return Err(ReleaseError::client(format!(
                    "'{}' already exists on {}",
                    update.path, branch
                )))
            }
            (Some(file), Some(expected)) if &file.revision != expected => {
                return Err(ReleaseError::client(format!(
                    "'{}' changed on {} since it was read",
                    update.path, branch
                )))
            }
            (None, Some(_)) => {
                return Err(ReleaseError::client(format!(
                    "'{}' does not exist on {}",
                    update.path, branch
                )))
            }
            _ => {}
        }

        let mut written = self.written.lock().map_err(|_| Self::lock_error())?;
        written.push((branch.to_string(), update.clone()));
        let revision = RevisionMarker::new(format!("rev-{}", written.len()));

        self.branch_files
            .lock()
            .map_err(|_| Self::lock_error())?
            .insert(
                (branch.to_string(), update.path.clone()),
                RemoteFile {
                    content: update.content.clone(),
                    revision: revision.clone(),
                },
            );
        Ok(revision)
    }

    fn create_pull_request(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<PullRequest> {
        self.check()?;
        let mut pulls = self.pull_requests.lock().map_err(|_| Self::lock_error())?;
        let number = pulls.len() as u64 + 1;
        pulls.push(RecordedPullRequest {
            number,
            title: title.to_string(),
            body: body.to_string(),
            head: head.to_string(),
            base: base.to_string(),
        });
        Ok(Self::pull_request(number))
    }

    fn find_open_pull_request(&self, head: &str, base: &str) -> Result<Option<PullRequest>> {
        self.check()?;
        let pulls = self.pull_requests.lock().map_err(|_| Self::lock_error())?;
        Ok(pulls
            .iter()
            .find(|pr| pr.head == head && pr.base == base)
            .map(|pr| Self::pull_request(pr.number)))
    }

    fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<PullRequest> {
        self.check()?;
        let mut pulls = self.pull_requests.lock().map_err(|_| Self::lock_error())?;
        let pr = pulls
            .iter_mut()
            .find(|pr| pr.number == number)
            .ok_or_else(|| ReleaseError::client(format!("Pull request #{} not found", number)))?;
        pr.title = title.to_string();
        pr.body = body.to_string();
        Ok(Self::pull_request(number))
    }
}
