use std::fmt;

const BRANCH_PREFIX: &str = "release-please--branches--";
const COMPONENT_SEPARATOR: &str = "--components--";

/// Head branch that carries a release pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBranch {
    pub target: String,
    pub component: Option<String>,
}

impl ReleaseBranch {
    /// Create a release branch name for a target branch
    pub fn new(target: impl Into<String>, component: Option<&str>) -> Self {
        ReleaseBranch {
            target: target.into(),
            component: component.map(str::to_string),
        }
    }

    /// Recover target and component from a branch name created by `new`
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(BRANCH_PREFIX)?;
        let (target, component) = match rest.split_once(COMPONENT_SEPARATOR) {
            Some((target, component)) => (target, Some(component)),
            None => (rest, None),
        };
        if target.is_empty() || component == Some("") {
            return None;
        }
        Some(ReleaseBranch::new(target, component))
    }
}

impl fmt::Display for ReleaseBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", BRANCH_PREFIX, self.target)?;
        if let Some(component) = &self.component {
            write!(f, "{}{}", COMPONENT_SEPARATOR, component)?;
        }
        Ok(())
    }
}
