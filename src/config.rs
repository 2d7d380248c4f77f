use crate::analyzer::BumpPolicy;
use crate::domain::{TagName, TagSeparator, Version};
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const CONFIG_FILE_NAME: &str = "release-pr.toml";

/// Represents the complete configuration for release-pr.
///
/// Contains the tracked branch, tag naming, versioning policy, changelog
/// layout, pull request templates, and the files staged with every release.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// Branch to release from; the client's default branch when absent
    #[serde(default)]
    pub target_branch: Option<String>,

    /// Component name for multi-package repositories
    #[serde(default)]
    pub component: Option<String>,

    #[serde(default)]
    pub tagging: TaggingConfig,

    #[serde(default)]
    pub versioning: VersioningConfig,

    #[serde(default)]
    pub conventional_commits: ConventionalCommitsConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub pull_request: PullRequestConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,

    #[serde(default)]
    pub extra_files: Vec<ExtraFileConfig>,
}

fn default_true() -> bool {
    true
}

fn default_separator() -> String {
    "-".to_string()
}

/// Configuration for tag naming.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TaggingConfig {
    #[serde(default = "default_true")]
    pub include_component_in_tag: bool,

    #[serde(default = "default_true")]
    pub include_v: bool,

    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        TaggingConfig {
            include_component_in_tag: true,
            include_v: true,
            separator: default_separator(),
        }
    }
}

/// Pre-1.0 version bump policy.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersioningConfig {
    /// At 0.x, breaking changes bump minor instead of major
    #[serde(default = "default_true")]
    pub bump_minor_pre_major: bool,

    /// At 0.x, features bump patch instead of minor
    #[serde(default)]
    pub bump_patch_for_minor_pre_major: bool,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        VersioningConfig {
            bump_minor_pre_major: true,
            bump_patch_for_minor_pre_major: false,
        }
    }
}

/// One changelog section: the commit type it collects and its heading.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SectionConfig {
    #[serde(rename = "type")]
    pub commit_type: String,

    pub section: String,

    /// Hidden sections are neither rendered nor release-worthy
    #[serde(default)]
    pub hidden: bool,
}

impl SectionConfig {
    fn new(commit_type: &str, section: &str, hidden: bool) -> Self {
        SectionConfig {
            commit_type: commit_type.to_string(),
            section: section.to_string(),
            hidden,
        }
    }
}

/// Returns the default changelog sections, in rendering order.
fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("feat", "Features", false),
        SectionConfig::new("fix", "Bug Fixes", false),
        SectionConfig::new("perf", "Performance Improvements", false),
        SectionConfig::new("revert", "Reverts", false),
        SectionConfig::new("deps", "Dependencies", false),
        SectionConfig::new("docs", "Documentation", true),
        SectionConfig::new("style", "Styles", true),
        SectionConfig::new("chore", "Miscellaneous Chores", true),
        SectionConfig::new("refactor", "Code Refactoring", true),
        SectionConfig::new("test", "Tests", true),
        SectionConfig::new("build", "Build System", true),
        SectionConfig::new("ci", "Continuous Integration", true),
    ]
}

/// Configuration for conventional commit classification.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            sections: default_sections(),
        }
    }
}

impl ConventionalCommitsConfig {
    /// Visible, non-feature commit types that warrant a patch release
    pub fn patch_types(&self) -> Vec<String> {
        self.sections
            .iter()
            .filter(|s| !s.hidden && s.commit_type != "feat")
            .map(|s| s.commit_type.clone())
            .collect()
    }
}

fn default_changelog_path() -> String {
    "CHANGELOG.md".to_string()
}

fn default_changelog_header() -> String {
    "# Changelog".to_string()
}

/// Configuration for the changelog file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_changelog_path")]
    pub path: String,

    /// Top-level heading written into a new changelog
    #[serde(default = "default_changelog_header")]
    pub header: String,

    /// Hosting platform base URL, e.g. "https://github.com"
    #[serde(default)]
    pub host: Option<String>,

    /// Repository slug on the host, e.g. "owner/repo"
    #[serde(default)]
    pub repository: Option<String>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: default_changelog_path(),
            header: default_changelog_header(),
            host: None,
            repository: None,
        }
    }
}

impl ChangelogConfig {
    /// Base URL for commit and compare links, when both host and repository are set
    pub fn repository_url(&self) -> Option<String> {
        match (&self.host, &self.repository) {
            (Some(host), Some(repo)) => Some(format!(
                "{}/{}",
                host.trim_end_matches('/'),
                repo.trim_matches('/')
            )),
            _ => None,
        }
    }
}

fn default_pr_header() -> String {
    ":robot: I have created a release *beep* *boop*".to_string()
}

fn default_pr_footer() -> String {
    "This PR was generated with release-pr.".to_string()
}

/// Configuration for the release pull request text.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PullRequestConfig {
    /// Title template with `{branch}`, `{component}` and `{version}` placeholders
    #[serde(default)]
    pub title_pattern: Option<String>,

    #[serde(default = "default_pr_header")]
    pub header: String,

    #[serde(default = "default_pr_footer")]
    pub footer: String,
}

impl Default for PullRequestConfig {
    fn default() -> Self {
        PullRequestConfig {
            title_pattern: None,
            header: default_pr_header(),
            footer: default_pr_footer(),
        }
    }
}

/// What to do when the previous release tag's commit is outside the fetched history.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MissingBoundaryPolicy {
    /// Abort with `ReleaseError::BoundaryNotFound`
    #[default]
    Fail,
    /// Ignore the previous tag and release the whole fetched history
    InitialRelease,
}

fn default_commit_search_depth() -> usize {
    500
}

fn default_tag_search_depth() -> usize {
    100
}

/// Configuration for history fetching and boundary handling.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    #[serde(default = "default_commit_search_depth")]
    pub commit_search_depth: usize,

    #[serde(default = "default_tag_search_depth")]
    pub tag_search_depth: usize,

    #[serde(default)]
    pub missing_boundary: MissingBoundaryPolicy,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            commit_search_depth: default_commit_search_depth(),
            tag_search_depth: default_tag_search_depth(),
            missing_boundary: MissingBoundaryPolicy::default(),
        }
    }
}

/// How the version is spliced into an extra file.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExtraFileKind {
    /// Lines annotated with `x-release-please-version`
    #[default]
    Generic,
    /// `package.version` of a Cargo manifest
    CargoToml,
}

/// A manifest whose version is updated with each release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExtraFileConfig {
    pub path: String,

    #[serde(default)]
    pub kind: ExtraFileKind,

    /// Content used when the file does not exist yet; absent means skip
    #[serde(default)]
    pub template: Option<String>,
}

impl Config {
    /// Component written into tags, if any
    pub fn tag_component(&self) -> Option<&str> {
        if self.tagging.include_component_in_tag {
            self.component.as_deref()
        } else {
            None
        }
    }

    pub fn tag_separator(&self) -> Result<TagSeparator> {
        TagSeparator::parse(&self.tagging.separator)
    }

    pub fn bump_policy(&self) -> BumpPolicy {
        BumpPolicy {
            bump_minor_pre_major: self.versioning.bump_minor_pre_major,
            bump_patch_for_minor_pre_major: self.versioning.bump_patch_for_minor_pre_major,
        }
    }

    /// Title template, falling back to the component-aware default
    pub fn title_pattern(&self) -> &str {
        match (&self.pull_request.title_pattern, &self.component) {
            (Some(pattern), _) => pattern.as_str(),
            (None, Some(_)) => "chore({branch}): release {component} {version}",
            (None, None) => "chore({branch}): release {version}",
        }
    }

    /// Paths staged by every release, changelog first
    pub fn update_paths(&self) -> Vec<&str> {
        std::iter::once(self.changelog.path.as_str())
            .chain(self.extra_files.iter().map(|f| f.path.as_str()))
            .collect()
    }

    /// Check settings that would otherwise fail mid-plan
    pub fn validate(&self) -> Result<()> {
        let separator = self.tag_separator()?;
        // a throwaway tag proves the component is usable with this separator
        TagName::new(
            Version::default(),
            self.tag_component(),
            separator,
            self.tagging.include_v,
        )?;

        if let Some(branch) = &self.target_branch {
            if branch.trim().is_empty() {
                return Err(ReleaseError::config("target_branch must not be empty"));
            }
        }

        let mut seen = HashSet::new();
        for path in self.update_paths() {
            if path.trim().is_empty() {
                return Err(ReleaseError::config("update paths must not be empty"));
            }
            if !seen.insert(path) {
                return Err(ReleaseError::config(format!(
                    "Path '{}' is configured more than once",
                    path
                )));
            }
        }

        if self.behavior.commit_search_depth == 0 || self.behavior.tag_search_depth == 0 {
            return Err(ReleaseError::config("search depths must be greater than zero"));
        }

        if !self.title_pattern().contains("{version}") {
            return Err(ReleaseError::config(
                "pull_request.title_pattern must contain {version}",
            ));
        }

        let mut types = HashSet::new();
        for section in &self.conventional_commits.sections {
            if !types.insert(section.commit_type.to_ascii_lowercase()) {
                return Err(ReleaseError::config(format!(
                    "Commit type '{}' appears in more than one changelog section",
                    section.commit_type
                )));
            }
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-pr.toml` in current directory
/// 3. `release-pr.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// The loaded configuration is validated before it is returned.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);
    let path = if let Some(path) = config_path {
        Some(Path::new(path).to_path_buf())
    } else if local.exists() {
        Some(local)
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|p| p.exists())
    };

    let config = match path {
        Some(path) => {
            let config_str = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            parse_config(&config_str)?
        }
        None => Config::default(),
    };

    config.validate()?;
    Ok(config)
}

/// Parse configuration from TOML text
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| ReleaseError::config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.changelog.path, "CHANGELOG.md");
        assert_eq!(config.title_pattern(), "chore({branch}): release {version}");
        assert!(config.versioning.bump_minor_pre_major);
        assert!(!config.versioning.bump_patch_for_minor_pre_major);
    }

    #[test]
    fn test_patch_types_skip_hidden_and_feat() {
        let config = ConventionalCommitsConfig::default();
        let types = config.patch_types();
        assert_eq!(types, vec!["fix", "perf", "revert", "deps"]);
    }

    #[test]
    fn test_component_title_default() {
        let config = Config {
            component: Some("core".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.title_pattern(),
            "chore({branch}): release {component} {version}"
        );
        assert_eq!(config.tag_component(), Some("core"));
    }

    #[test]
    fn test_component_excluded_from_tag() {
        let mut config = Config {
            component: Some("core".to_string()),
            ..Config::default()
        };
        config.tagging.include_component_in_tag = false;
        assert_eq!(config.tag_component(), None);
    }

    #[test]
    fn test_validate_rejects_duplicate_paths() {
        let mut config = Config::default();
        config.extra_files.push(ExtraFileConfig {
            path: "CHANGELOG.md".to_string(),
            kind: ExtraFileKind::Generic,
            template: None,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_separator() {
        let mut config = Config::default();
        config.tagging.separator = "_".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_pattern_without_version() {
        let mut config = Config::default();
        config.pull_request.title_pattern = Some("chore: release".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let mut config = Config::default();
        config.behavior.commit_search_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_repository_url() {
        let mut changelog = ChangelogConfig::default();
        assert_eq!(changelog.repository_url(), None);
        changelog.host = Some("https://github.com/".to_string());
        changelog.repository = Some("acme/widgets".to_string());
        assert_eq!(
            changelog.repository_url().as_deref(),
            Some("https://github.com/acme/widgets")
        );
    }

    #[test]
    fn test_parse_config_from_toml() {
        let config = parse_config(
            r#"
target_branch = "develop"
component = "core"

[tagging]
separator = "/"
include_v = false

[behavior]
missing_boundary = "initial-release"

[[extra_files]]
path = "Cargo.toml"
kind = "cargo-toml"
"#,
        )
        .unwrap();
        assert_eq!(config.target_branch.as_deref(), Some("develop"));
        assert_eq!(config.tag_separator().unwrap(), TagSeparator::Slash);
        assert!(!config.tagging.include_v);
        assert_eq!(
            config.behavior.missing_boundary,
            MissingBoundaryPolicy::InitialRelease
        );
        assert_eq!(config.extra_files[0].kind, ExtraFileKind::CargoToml);
        assert_eq!(config.behavior.commit_search_depth, 500);
    }
}
