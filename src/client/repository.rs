use crate::client::{RemoteTag, RepositoryClient};
use crate::domain::RawCommit;
use crate::error::{ReleaseError, Result};
use crate::updater::RemoteFile;
use git2::{ErrorCode, ObjectType, Repository as Git2Repo, Sort};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Read-only client over a local git repository
///
/// Branches are resolved locally first, then as `origin/<branch>`.
pub struct Git2Client {
    repo: Mutex<Git2Repo>,
}

impl Git2Client {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Client::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Client {
            repo: Mutex::new(repo),
        }
    }

    fn repo(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.repo
            .lock()
            .map_err(|_| ReleaseError::client("git repository handle poisoned"))
    }
}

fn resolve_branch<'r>(repo: &'r Git2Repo, branch: &str) -> Result<git2::Object<'r>> {
    for spec in [branch.to_string(), format!("origin/{}", branch)] {
        match repo.revparse_single(&spec) {
            Ok(object) => return Ok(object),
            Err(e) if e.code() == ErrorCode::NotFound => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(ReleaseError::client(format!("Branch not found: {}", branch)))
}

impl RepositoryClient for Git2Client {
    fn default_branch(&self) -> Result<String> {
        let repo = self.repo()?;

        if let Ok(reference) = repo.find_reference("refs/remotes/origin/HEAD") {
            if let Some(target) = reference.symbolic_target() {
                if let Some(name) = target.strip_prefix("refs/remotes/origin/") {
                    return Ok(name.to_string());
                }
            }
        }

        let name = match repo.head() {
            Ok(head) if head.is_branch() => head
                .shorthand()
                .unwrap_or(super::wire::DEFAULT_BRANCH)
                .to_string(),
            _ => super::wire::DEFAULT_BRANCH.to_string(),
        };
        Ok(name)
    }

    fn list_tags(&self, limit: usize) -> Result<Vec<RemoteTag>> {
        let repo = self.repo()?;
        let names = repo.tag_names(None)?;

        let mut tags = Vec::new();
        for name in names.iter().flatten() {
            let reference = repo.find_reference(&format!("refs/tags/{}", name))?;
            let commit = match reference.peel(ObjectType::Commit) {
                Ok(object) => object.peel_to_commit()?,
                Err(e) => {
                    tracing::debug!("Ignoring tag '{}' that does not point at a commit: {}", name, e);
                    continue;
                }
            };
            tags.push((commit.time().seconds(), RemoteTag::new(name, commit.id().to_string())));
        }

        tags.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.name.cmp(&a.1.name)));
        Ok(tags.into_iter().take(limit).map(|(_, tag)| tag).collect())
    }

    fn list_commits(&self, branch: &str, limit: usize) -> Result<Vec<RawCommit>> {
        let repo = self.repo()?;
        let head = resolve_branch(&repo, branch)?.peel_to_commit()?;

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;

        let mut commits = Vec::new();
        for oid_result in revwalk.take(limit) {
            let oid = oid_result?;
            let commit = repo.find_commit(oid)?;

            let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
            let parents = commit.parent_ids().map(|p| p.to_string()).collect();
            commits.push(RawCommit::new(oid.to_string(), message, parents));
        }

        Ok(commits)
    }

    fn file_content(&self, path: &str, git_ref: &str) -> Result<Option<RemoteFile>> {
        let repo = self.repo()?;
        let tree = resolve_branch(&repo, git_ref)?.peel_to_tree()?;

        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let object = entry.to_object(&repo)?;
        let Some(blob) = object.as_blob() else {
            return Ok(None);
        };

        let content = String::from_utf8_lossy(blob.content()).into_owned();
        Ok(Some(RemoteFile::new(content, blob.id().to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn commit_file(repo: &Git2Repo, path: &str, content: &str, message: &str) -> git2::Oid {
        let workdir = repo.workdir().unwrap();
        std::fs::write(workdir.join(path), content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(path)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("Test", "test@example.com").unwrap();

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[test]
    fn test_git2_client_reads_history() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        let first = commit_file(&repo, "CHANGELOG.md", "# Changelog\n", "chore: init");
        {
            let object = repo.find_object(first, None).unwrap();
            repo.tag_lightweight("v0.1.0", &object, false).unwrap();
        }
        let second = commit_file(&repo, "lib.txt", "x", "feat: second");

        let branch = repo.head().unwrap().shorthand().unwrap().to_string();
        let client = Git2Client::from_git2(repo);

        assert_eq!(client.default_branch().unwrap(), branch);

        let commits = client.list_commits(&branch, 10).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].sha, second.to_string());
        assert_eq!(commits[0].parents, vec![first.to_string()]);
        assert_eq!(commits[0].message, "feat: second");

        let tags = client.list_tags(10).unwrap();
        assert_eq!(tags, vec![RemoteTag::new("v0.1.0", first.to_string())]);

        let file = client.file_content("CHANGELOG.md", &branch).unwrap().unwrap();
        assert_eq!(file.content, "# Changelog\n");
        assert!(client.file_content("missing.md", &branch).unwrap().is_none());
    }

    #[test]
    fn test_git2_client_unknown_branch() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        commit_file(&repo, "a.txt", "a", "chore: init");
        let client = Git2Client::from_git2(repo);

        assert!(matches!(
            client.list_commits("no-such-branch", 10),
            Err(ReleaseError::Client(_))
        ));
    }
}
