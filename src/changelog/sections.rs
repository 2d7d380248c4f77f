use crate::config::SectionConfig;
use crate::domain::ClassifiedCommit;

/// Heading of the section that lists breaking changes
pub const BREAKING_LABEL: &str = "⚠ BREAKING CHANGES";

/// One labeled group of commits in a changelog entry
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogSection {
    pub label: String,
    pub breaking: bool,
    pub commits: Vec<ClassifiedCommit>,
}

/// Group commits into sections: breaking changes, features, fixes, then the
/// remaining visible sections in configured order.
///
/// A breaking commit is listed only under breaking changes. Hidden and
/// unconfigured types are dropped, as are empty sections. Commits keep their
/// input order within a section.
pub fn group_commits(
    commits: &[ClassifiedCommit],
    sections: &[SectionConfig],
) -> Vec<ChangelogSection> {
    let mut grouped = Vec::new();

    let breaking: Vec<ClassifiedCommit> = commits.iter().filter(|c| c.breaking).cloned().collect();
    if !breaking.is_empty() {
        grouped.push(ChangelogSection {
            label: BREAKING_LABEL.to_string(),
            breaking: true,
            commits: breaking,
        });
    }

    for section in ordered_visible(sections) {
        let members: Vec<ClassifiedCommit> = commits
            .iter()
            .filter(|c| {
                !c.breaking && section.commit_type.eq_ignore_ascii_case(c.commit_type.as_str())
            })
            .cloned()
            .collect();
        if members.is_empty() {
            continue;
        }
        grouped.push(ChangelogSection {
            label: section.section.clone(),
            breaking: false,
            commits: members,
        });
    }

    grouped
}

fn ordered_visible(sections: &[SectionConfig]) -> Vec<&SectionConfig> {
    let rank = |s: &SectionConfig| match s.commit_type.to_ascii_lowercase().as_str() {
        "feat" => 0,
        "fix" => 1,
        _ => 2,
    };
    let mut visible: Vec<&SectionConfig> = sections.iter().filter(|s| !s.hidden).collect();
    // stable sort keeps configured order among the remaining sections
    visible.sort_by_key(|s| rank(*s));
    visible
}
