use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>[A-Za-z][A-Za-z0-9_-]*)(?:\((?P<scope>[^()]*)\))?(?P<bang>!)?:[ \t]+(?P<subject>\S.*?)\s*$",
    )
    .expect("valid conventional header pattern")
});

static FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<token>(?i:BREAKING[ -]CHANGE)|[A-Za-z][A-Za-z0-9-]*)(?::[ \t]+| #)(?P<value>.*)$")
        .expect("valid conventional footer pattern")
});

/// A commit as supplied by the repository client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawCommit {
    pub sha: String,
    pub message: String,
    pub parents: Vec<String>,
}

impl RawCommit {
    pub fn new(sha: impl Into<String>, message: impl Into<String>, parents: Vec<String>) -> Self {
        RawCommit {
            sha: sha.into(),
            message: message.into(),
            parents,
        }
    }

    /// Classify this commit, or `None` when the message is not conventional
    pub fn classify(&self) -> Option<ClassifiedCommit> {
        ClassifiedCommit::parse(&self.sha, &self.message)
    }
}

/// Commit type from the conventional header
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommitType {
    Feat,
    Fix,
    /// Any other type, lowercased (e.g. "perf", "docs", "chore")
    Other(String),
}

impl CommitType {
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "feat" => CommitType::Feat,
            "fix" => CommitType::Fix,
            other => CommitType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Other(s) => s,
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CommitType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A trailer line such as `Refs: #12` or `BREAKING CHANGE: ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub token: String,
    pub value: String,
}

impl Footer {
    pub fn is_breaking_change(&self) -> bool {
        self.token.eq_ignore_ascii_case("BREAKING CHANGE")
            || self.token.eq_ignore_ascii_case("BREAKING-CHANGE")
    }
}

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedCommit {
    pub sha: String,
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub breaking: bool,
    pub subject: String,
    pub body: Option<String>,
    /// Footers in declaration order; duplicate tokens are kept
    pub footers: Vec<Footer>,
    /// Breaking-change descriptions taken from `BREAKING CHANGE` footers
    pub notes: Vec<String>,
}

impl ClassifiedCommit {
    /// Parse a commit message according to the conventional commits grammar.
    ///
    /// Supports `type(scope)!: subject` with scope and `!` optional, followed by
    /// an optional body and footer block. Returns `None` for anything else.
    pub fn parse(sha: &str, message: &str) -> Option<Self> {
        let mut lines = message.lines();
        let header = lines.next()?;
        let captures = HEADER_RE.captures(header)?;

        let commit_type = CommitType::from_token(&captures["type"]);
        let scope = captures
            .name("scope")
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());
        let has_bang = captures.name("bang").is_some();
        let subject = captures["subject"].to_string();

        let rest: Vec<&str> = lines.collect();
        let footer_start = find_footer_start(&rest);
        let body = join_trimmed(&rest[..footer_start]);
        let footers = parse_footers(&rest[footer_start..]);

        let notes: Vec<String> = footers
            .iter()
            .filter(|f| f.is_breaking_change())
            .map(|f| f.value.clone())
            .collect();
        let breaking = has_bang || !notes.is_empty();

        Some(ClassifiedCommit {
            sha: sha.to_string(),
            commit_type,
            scope,
            breaking,
            subject,
            body,
            footers,
            notes,
        })
    }

    /// Short sha used in rendered links
    pub fn short_sha(&self) -> &str {
        let end = self
            .sha
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.sha.len());
        &self.sha[..end]
    }
}

/// Index of the first paragraph (after a blank line) that opens with a footer
fn find_footer_start(lines: &[&str]) -> usize {
    (1..lines.len())
        .find(|&i| lines[i - 1].trim().is_empty() && FOOTER_RE.is_match(lines[i]))
        .unwrap_or(lines.len())
}

fn parse_footers(lines: &[&str]) -> Vec<Footer> {
    let mut footers: Vec<Footer> = Vec::new();

    for line in lines {
        if let Some(captures) = FOOTER_RE.captures(line) {
            footers.push(Footer {
                token: captures["token"].to_string(),
                value: captures["value"].trim_end().to_string(),
            });
        } else if let Some(last) = footers.last_mut() {
            // continuation of a multi-line footer value
            last.value.push('\n');
            last.value.push_str(line.trim_end());
        }
    }

    for footer in &mut footers {
        footer.value = footer.value.trim_end().to_string();
    }
    footers
}

fn join_trimmed(lines: &[&str]) -> Option<String> {
    let text = lines.join("\n");
    let text = text.trim_matches(|c| c == '\n' || c == '\r');
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(message: &str) -> Option<ClassifiedCommit> {
        ClassifiedCommit::parse("abc1234def", message)
    }

    #[test]
    fn test_parse_with_scope() {
        let commit = parse("feat(auth): add login").unwrap();
        assert_eq!(commit.commit_type, CommitType::Feat);
        assert_eq!(commit.scope, Some("auth".to_string()));
        assert_eq!(commit.subject, "add login");
        assert!(!commit.breaking);
    }

    #[test]
    fn test_parse_with_breaking_marker() {
        let commit = parse("feat(auth)!: redesign login").unwrap();
        assert_eq!(commit.commit_type, CommitType::Feat);
        assert!(commit.breaking);
        assert!(commit.notes.is_empty());
    }

    #[test]
    fn test_parse_breaking_without_scope() {
        let commit = parse("fix!: drop legacy flag").unwrap();
        assert_eq!(commit.commit_type, CommitType::Fix);
        assert_eq!(commit.scope, None);
        assert!(commit.breaking);
    }

    #[test]
    fn test_parse_other_type_lowercased() {
        let commit = parse("Perf: faster startup").unwrap();
        assert_eq!(commit.commit_type, CommitType::Other("perf".to_string()));
    }

    #[test]
    fn test_parse_non_conventional() {
        assert!(parse("Random commit message").is_none());
        assert!(parse("Merge pull request #12 from foo/bar").is_none());
        assert!(parse("feat:missing space").is_none());
        assert!(parse("feat: ").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn test_parse_breaking_change_footer() {
        let commit = parse("fix: something\n\nBREAKING CHANGE: config format changed").unwrap();
        assert!(commit.breaking);
        assert_eq!(commit.notes, vec!["config format changed".to_string()]);
    }

    #[test]
    fn test_parse_breaking_change_footer_variants() {
        for token in ["BREAKING-CHANGE", "breaking change", "Breaking-Change"] {
            let message = format!("feat: x\n\n{}: gone", token);
            let commit = parse(&message).unwrap();
            assert!(commit.breaking, "token {}", token);
            assert_eq!(commit.notes, vec!["gone".to_string()]);
        }
    }

    #[test]
    fn test_breaking_text_in_body_is_not_a_footer() {
        let commit = parse("feat: x\n\nthis mentions BREAKING CHANGE: inline").unwrap();
        assert!(!commit.breaking);
        assert!(commit.body.is_some());
    }

    #[test]
    fn test_parse_body_and_footers() {
        let message = "fix(parser): handle tabs\n\nTabs were treated as spaces.\nNow they are not.\n\nRefs: #12\nReviewed-by: Sam\nRefs: #14\nCloses #15";
        let commit = parse(message).unwrap();
        assert_eq!(
            commit.body.as_deref(),
            Some("Tabs were treated as spaces.\nNow they are not.")
        );
        let tokens: Vec<&str> = commit.footers.iter().map(|f| f.token.as_str()).collect();
        assert_eq!(tokens, vec!["Refs", "Reviewed-by", "Refs", "Closes"]);
        assert_eq!(commit.footers[2].value, "#14");
        assert_eq!(commit.footers[3].value, "15");
    }

    #[test]
    fn test_multiline_footer_value() {
        let message = "feat: new api\n\nBREAKING CHANGE: the old endpoint\nis removed\nRefs: #3";
        let commit = parse(message).unwrap();
        assert_eq!(commit.notes, vec!["the old endpoint\nis removed".to_string()]);
        assert_eq!(commit.footers.len(), 2);
    }

    #[test]
    fn test_crlf_message() {
        let commit = parse("fix: windows\r\n\r\nRefs: #9\r\n").unwrap();
        assert_eq!(commit.subject, "windows");
        assert_eq!(commit.footers[0].value, "#9");
    }

    #[test]
    fn test_short_sha() {
        let commit = parse("fix: x").unwrap();
        assert_eq!(commit.short_sha(), "abc1234");
        let tiny = ClassifiedCommit::parse("ab", "fix: x").unwrap();
        assert_eq!(tiny.short_sha(), "ab");
    }

    #[test]
    fn test_raw_commit_classify() {
        let raw = RawCommit::new("def456", "feat: add new capability", vec!["abc123".into()]);
        let commit = raw.classify().unwrap();
        assert_eq!(commit.sha, "def456");
        assert_eq!(commit.subject, "add new capability");
    }
}
