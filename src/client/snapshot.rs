use crate::client::{RemoteTag, RepositoryClient};
use crate::config::Config;
use crate::domain::RawCommit;
use crate::error::Result;
use crate::updater::RemoteFile;
use std::collections::BTreeMap;

/// Everything the planner reads, captured in one pass before planning.
///
/// Planning never goes back to the client, so nothing may be pushed to the
/// repository between [`Snapshot::capture`] and the plan being published.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub target_branch: String,
    /// Newest first
    pub tags: Vec<RemoteTag>,
    /// Newest first
    pub commits: Vec<RawCommit>,
    /// Every update path, `None` when absent on the target branch
    pub files: BTreeMap<String, Option<RemoteFile>>,
}

impl Snapshot {
    /// Fetch tags, commits and target files for the configured branch
    pub fn capture<C: RepositoryClient + ?Sized>(client: &C, config: &Config) -> Result<Self> {
        let target_branch = match &config.target_branch {
            Some(branch) => branch.clone(),
            None => client.default_branch()?,
        };

        let tags = client.list_tags(config.behavior.tag_search_depth)?;
        let commits = client.list_commits(&target_branch, config.behavior.commit_search_depth)?;

        let mut files = BTreeMap::new();
        for path in config.update_paths() {
            let file = client.file_content(path, &target_branch)?;
            files.insert(path.to_string(), file);
        }

        tracing::debug!(
            "Captured {} tags and {} commits from {}",
            tags.len(),
            commits.len(),
            target_branch
        );

        Ok(Snapshot {
            target_branch,
            tags,
            commits,
            files,
        })
    }

    /// Current state of a captured file
    pub fn file(&self, path: &str) -> Option<&RemoteFile> {
        self.files.get(path).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockClient;
    use crate::config::{ExtraFileConfig, ExtraFileKind};

    #[test]
    fn test_capture_uses_default_branch_and_all_paths() {
        let mut client = MockClient::new("trunk");
        client.add_commit("a", "fix: a", &[]);
        client.add_file("CHANGELOG.md", "# Changelog\n", "changelogsha");

        let mut config = Config::default();
        config.extra_files.push(ExtraFileConfig {
            path: "Cargo.toml".to_string(),
            kind: ExtraFileKind::CargoToml,
            template: None,
        });

        let snapshot = Snapshot::capture(&client, &config).unwrap();
        assert_eq!(snapshot.target_branch, "trunk");
        assert_eq!(snapshot.commits.len(), 1);
        assert_eq!(snapshot.files.len(), 2);
        assert!(snapshot.file("CHANGELOG.md").is_some());
        assert!(snapshot.file("Cargo.toml").is_none());
        assert_eq!(snapshot.files.get("Cargo.toml"), Some(&None));
    }

    #[test]
    fn test_capture_respects_configured_branch_and_depth() {
        let mut client = MockClient::new("main");
        for sha in ["c", "b", "a"] {
            client.add_commit(sha, "fix: x", &[]);
        }
        let mut config = Config::default();
        config.target_branch = Some("release/1.x".to_string());
        config.behavior.commit_search_depth = 2;

        let snapshot = Snapshot::capture(&client, &config).unwrap();
        assert_eq!(snapshot.target_branch, "release/1.x");
        assert_eq!(snapshot.commits.len(), 2);
    }

    #[test]
    fn test_capture_propagates_transport_errors() {
        let mut client = MockClient::new("main");
        client.fail_with("502 Bad Gateway");
        assert!(Snapshot::capture(&client, &Config::default()).is_err());
    }
}
