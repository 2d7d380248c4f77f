use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<component>.+?)(?P<sep>[-/]?))??(?P<v>v)?(?P<version>\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)$",
    )
    .expect("valid tag pattern")
});

static VERSION_LIKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").expect("valid version-like pattern"));

/// Separator placed between a component and the version part of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TagSeparator {
    #[default]
    Hyphen,
    Slash,
    Empty,
}

impl TagSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagSeparator::Hyphen => "-",
            TagSeparator::Slash => "/",
            TagSeparator::Empty => "",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "-" => Ok(TagSeparator::Hyphen),
            "/" => Ok(TagSeparator::Slash),
            "" => Ok(TagSeparator::Empty),
            other => Err(ReleaseError::tag(format!(
                "Unsupported tag separator '{}': expected '-', '/' or ''",
                other
            ))),
        }
    }
}

/// A release tag: `[component separator][v]version`.
///
/// Parsing is self-describing: component, separator and the `v` flag are all
/// recovered from the raw string. `TagName::new` only accepts combinations
/// whose formatted string parses back to the same fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName {
    version: Version,
    component: Option<String>,
    separator: TagSeparator,
    include_v: bool,
}

impl TagName {
    /// Build a tag from its parts.
    ///
    /// The separator is only meaningful with a component and is normalized to
    /// `TagSeparator::Empty` when there is none.
    pub fn new(
        version: Version,
        component: Option<&str>,
        separator: TagSeparator,
        include_v: bool,
    ) -> Result<Self> {
        let separator = match component {
            Some(component) => {
                validate_component(component, separator)?;
                separator
            }
            None => TagSeparator::Empty,
        };

        Ok(TagName {
            version,
            component: component.map(str::to_string),
            separator,
            include_v,
        })
    }

    /// Parse a raw tag string, or `None` if it is not a release tag
    pub fn parse(raw: &str) -> Option<Self> {
        let captures = TAG_RE.captures(raw)?;
        let version = Version::parse(&captures["version"]).ok()?;
        let component = captures.name("component").map(|m| m.as_str().to_string());
        let separator = match captures.name("sep").map(|m| m.as_str()) {
            Some("-") => TagSeparator::Hyphen,
            Some("/") => TagSeparator::Slash,
            _ => TagSeparator::Empty,
        };

        Some(TagName {
            version,
            component,
            separator,
            include_v: captures.name("v").is_some(),
        })
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    pub fn separator(&self) -> TagSeparator {
        self.separator
    }

    pub fn include_v(&self) -> bool {
        self.include_v
    }
}

fn validate_component(component: &str, separator: TagSeparator) -> Result<()> {
    let reject = |reason: &str| {
        Err(ReleaseError::tag(format!(
            "Component '{}' cannot be used in a tag: {}",
            component, reason
        )))
    };

    if component.is_empty() {
        return reject("empty component");
    }
    if component.chars().any(char::is_whitespace) {
        return reject("contains whitespace");
    }
    if component.ends_with('-') || component.ends_with('/') {
        return reject("ends with a separator character");
    }
    if VERSION_LIKE_RE.is_match(component) {
        return reject("contains a version number");
    }
    if separator == TagSeparator::Empty
        && component.ends_with(|c: char| c == 'v' || c.is_ascii_digit())
    {
        return reject("ends with 'v' or a digit and no separator is configured");
    }
    Ok(())
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(component) = &self.component {
            write!(f, "{}{}", component, self.separator.as_str())?;
        }
        if self.include_v {
            f.write_str("v")?;
        }
        write!(f, "{}", self.version)
    }
}

impl Serialize for TagName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
