use crate::changelog::ChangelogSection;
use crate::domain::{ClassifiedCommit, TagName, Version};
use chrono::NaiveDate;

/// Release facts printed in an entry heading
#[derive(Debug, Clone)]
pub struct EntryHeading<'a> {
    pub version: &'a Version,
    pub previous_tag: Option<&'a TagName>,
    pub current_tag: &'a TagName,
    pub date: NaiveDate,
}

/// Render one changelog entry; the result always ends with a newline.
///
/// With a repository URL the heading links to a compare view (when there is
/// a previous tag) and every bullet links to its commit.
pub fn render_entry(
    heading: &EntryHeading<'_>,
    sections: &[ChangelogSection],
    repository_url: Option<&str>,
) -> String {
    let date = heading.date.format("%Y-%m-%d");
    let mut output = match (repository_url, heading.previous_tag) {
        (Some(url), Some(previous)) => format!(
            "## [{}]({}/compare/{}...{}) ({})\n",
            heading.version, url, previous, heading.current_tag, date
        ),
        _ => format!("## {} ({})\n", heading.version, date),
    };

    for section in sections {
        output.push_str(&format!("\n### {}\n\n", section.label));
        for commit in &section.commits {
            if section.breaking {
                for text in breaking_texts(commit) {
                    output.push_str(&bullet(commit, text, repository_url));
                }
            } else {
                output.push_str(&bullet(commit, &commit.subject, repository_url));
            }
        }
    }

    output
}

fn breaking_texts(commit: &ClassifiedCommit) -> Vec<&str> {
    if commit.notes.is_empty() {
        vec![commit.subject.as_str()]
    } else {
        commit.notes.iter().map(String::as_str).collect()
    }
}

fn bullet(commit: &ClassifiedCommit, text: &str, repository_url: Option<&str>) -> String {
    let scope = commit
        .scope
        .as_ref()
        .map(|s| format!("**{}:** ", s))
        .unwrap_or_default();
    let link = repository_url
        .map(|url| format!(" ([{}]({}/commit/{}))", commit.short_sha(), url, commit.sha))
        .unwrap_or_default();

    format!("* {}{}{}\n", scope, text.replace('\n', "\n  "), link)
}

/// Insert `entry` right after the document's top-level heading, or at the
/// top when there is none. Existing entries are left untouched and the
/// entry takes the document's line ending.
pub fn merge_entry(existing: &str, entry: &str) -> String {
    let eol = line_ending(existing);
    let entry = if eol == "\r\n" {
        entry.replace("\r\n", "\n").replace('\n', eol)
    } else {
        entry.to_string()
    };
    let mut output = String::with_capacity(existing.len() + entry.len() + 4);

    let rest = match top_heading_end(existing) {
        Some(end) => {
            let head = &existing[..end];
            output.push_str(head);
            if !head.ends_with('\n') {
                output.push_str(eol);
            }
            output.push_str(eol);
            &existing[end..]
        }
        None => existing,
    };

    output.push_str(&entry);
    let rest = rest.trim_start_matches(['\n', '\r']);
    if !rest.is_empty() {
        output.push_str(eol);
        output.push_str(rest);
    }
    output
}

/// Line ending of the document's first line
fn line_ending(document: &str) -> &'static str {
    match document.find('\n') {
        Some(end) if document[..end].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Byte offset just past the leading `# ` heading line.
///
/// Only a heading that comes before the first entry and before any code
/// fence counts as the document title.
fn top_heading_end(document: &str) -> Option<usize> {
    let mut offset = 0;
    for line in document.split_inclusive('\n') {
        let text = line.trim_end_matches(['\n', '\r']);
        if text.starts_with("# ") || text == "#" {
            return Some(offset + line.len());
        }
        let trimmed = text.trim_start();
        if text.starts_with("##") || trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            return None;
        }
        offset += line.len();
    }
    None
}
