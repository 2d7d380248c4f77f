//! Changelog synthesis from conventional commits
//!
//! - `sections` - grouping commits under fixed, ordered labels
//! - `render` - entry text and merging into an existing document

pub mod render;
pub mod sections;

pub use render::{merge_entry, render_entry, EntryHeading};
pub use sections::{group_commits, ChangelogSection, BREAKING_LABEL};

use crate::config::{Config, SectionConfig};
use crate::domain::ClassifiedCommit;

/// Renders changelog entries with the configured sections and links
#[derive(Debug, Clone)]
pub struct ChangelogSynthesizer {
    sections: Vec<SectionConfig>,
    repository_url: Option<String>,
    header: String,
}

impl ChangelogSynthesizer {
    pub fn from_config(config: &Config) -> Self {
        ChangelogSynthesizer {
            sections: config.conventional_commits.sections.clone(),
            repository_url: config.changelog.repository_url(),
            header: config.changelog.header.clone(),
        }
    }

    /// Grouped, non-empty sections for a commit set
    pub fn sections(&self, commits: &[ClassifiedCommit]) -> Vec<ChangelogSection> {
        group_commits(commits, &self.sections)
    }

    /// The entry for one release
    pub fn entry(&self, heading: &EntryHeading<'_>, commits: &[ClassifiedCommit]) -> String {
        render_entry(
            heading,
            &self.sections(commits),
            self.repository_url.as_deref(),
        )
    }

    /// Content of a changelog that does not exist yet, before any entry
    pub fn template(&self) -> String {
        format!("{}\n", self.header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TagName, TagSeparator, Version};
    use chrono::NaiveDate;

    #[test]
    fn test_entry_merged_into_template() {
        let synthesizer = ChangelogSynthesizer::from_config(&Config::default());
        let version = Version::parse("0.0.1").unwrap();
        let tag = TagName::new(version.clone(), None, TagSeparator::Hyphen, true).unwrap();
        let commit = ClassifiedCommit::parse("def456", "fix: squash bug").unwrap();
        let heading = EntryHeading {
            version: &version,
            previous_tag: None,
            current_tag: &tag,
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        };

        let entry = synthesizer.entry(&heading, &[commit]);
        let document = merge_entry(&synthesizer.template(), &entry);
        assert_eq!(
            document,
            "# Changelog\n\n## 0.0.1 (2026-10-18)\n\n### Bug Fixes\n\n* squash bug\n"
        );
    }
}
