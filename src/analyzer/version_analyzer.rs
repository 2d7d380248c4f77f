use crate::config::Config;
use crate::domain::{ClassifiedCommit, CommitType, Version, VersionBump};
use crate::error::Result;

/// Pre-1.0 overrides for the bump decision.
///
/// `bump_minor_pre_major` only affects breaking changes and
/// `bump_patch_for_minor_pre_major` only affects features; with both set a
/// 0.x breaking change bumps minor and a 0.x feature bumps patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BumpPolicy {
    pub bump_minor_pre_major: bool,
    pub bump_patch_for_minor_pre_major: bool,
}

/// Analyzes classified commits to determine the next version
pub struct VersionAnalyzer {
    policy: BumpPolicy,
    patch_types: Vec<String>,
}

impl VersionAnalyzer {
    /// Create a new version analyzer.
    ///
    /// `patch_types` lists commit types besides `fix` that warrant a patch release.
    pub fn new(policy: BumpPolicy, patch_types: Vec<String>) -> Self {
        VersionAnalyzer {
            policy,
            patch_types,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        VersionAnalyzer::new(
            config.bump_policy(),
            config.conventional_commits.patch_types(),
        )
    }

    /// Decide the bump for a commit set, or `None` if nothing is release-worthy.
    ///
    /// Precedence over the whole set: breaking, then feature, then patch-worthy.
    pub fn analyze_commits(
        &self,
        current: &Version,
        commits: &[ClassifiedCommit],
    ) -> Option<VersionBump> {
        let pre_major = current.major == 0;

        if commits.iter().any(|c| c.breaking) {
            if pre_major && self.policy.bump_minor_pre_major {
                return Some(VersionBump::Minor);
            }
            return Some(VersionBump::Major);
        }

        if commits.iter().any(|c| c.commit_type == CommitType::Feat) {
            if pre_major && self.policy.bump_patch_for_minor_pre_major {
                return Some(VersionBump::Patch);
            }
            return Some(VersionBump::Minor);
        }

        if commits.iter().any(|c| self.is_patch_worthy(&c.commit_type)) {
            return Some(VersionBump::Patch);
        }

        None
    }

    /// Next version after `current`, or `None` if nothing is release-worthy
    pub fn next_version(
        &self,
        current: &Version,
        commits: &[ClassifiedCommit],
    ) -> Result<Option<Version>> {
        self.analyze_commits(current, commits)
            .map(|bump| current.bump(bump))
            .transpose()
    }

    fn is_patch_worthy(&self, commit_type: &CommitType) -> bool {
        *commit_type == CommitType::Fix
            || self
                .patch_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(commit_type.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;

    fn commits(messages: &[&str]) -> Vec<ClassifiedCommit> {
        messages
            .iter()
            .enumerate()
            .filter_map(|(i, m)| ClassifiedCommit::parse(&format!("sha{}", i), m))
            .collect()
    }

    fn analyzer(policy: BumpPolicy) -> VersionAnalyzer {
        VersionAnalyzer::new(policy, vec!["perf".to_string(), "revert".to_string()])
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_analyze_major() {
        let analyzer = analyzer(BumpPolicy::default());
        let set = commits(&["feat: new feature", "fix(api)!: breaking change"]);
        assert_eq!(
            analyzer.analyze_commits(&v("1.2.3"), &set),
            Some(VersionBump::Major)
        );
        assert_eq!(analyzer.next_version(&v("1.2.3"), &set).unwrap(), Some(v("2.0.0")));
    }

    #[test]
    fn test_analyze_minor() {
        let analyzer = analyzer(BumpPolicy::default());
        let set = commits(&["feat: new feature", "fix: bug fix"]);
        assert_eq!(analyzer.next_version(&v("1.2.3"), &set).unwrap(), Some(v("1.3.0")));
    }

    #[test]
    fn test_analyze_patch() {
        let analyzer = analyzer(BumpPolicy::default());
        assert_eq!(
            analyzer
                .next_version(&v("1.2.3"), &commits(&["fix: bug fix", "docs: typo"]))
                .unwrap(),
            Some(v("1.2.4"))
        );
        assert_eq!(
            analyzer.next_version(&v("1.2.3"), &commits(&["perf: faster"])).unwrap(),
            Some(v("1.2.4"))
        );
    }

    #[test]
    fn test_nothing_release_worthy() {
        let analyzer = analyzer(BumpPolicy::default());
        let set = commits(&["docs: readme", "chore: tidy", "test: more cases"]);
        assert_eq!(analyzer.analyze_commits(&v("1.2.3"), &set), None);
        assert_eq!(analyzer.next_version(&v("1.2.3"), &[]).unwrap(), None);
    }

    #[test]
    fn test_pre_major_breaking_defaults_to_major_without_flag() {
        let analyzer = analyzer(BumpPolicy::default());
        let set = commits(&["feat!: rework"]);
        assert_eq!(analyzer.next_version(&v("0.4.2"), &set).unwrap(), Some(v("1.0.0")));
    }

    #[test]
    fn test_pre_major_breaking_bumps_minor() {
        let analyzer = analyzer(BumpPolicy {
            bump_minor_pre_major: true,
            bump_patch_for_minor_pre_major: false,
        });
        assert_eq!(
            analyzer.next_version(&v("0.4.2"), &commits(&["feat!: rework"])).unwrap(),
            Some(v("0.5.0"))
        );
        assert_eq!(
            analyzer.next_version(&v("0.4.2"), &commits(&["feat: add"])).unwrap(),
            Some(v("0.5.0"))
        );
        // the override stops applying once 1.0 is reached
        assert_eq!(
            analyzer.next_version(&v("1.4.2"), &commits(&["feat!: rework"])).unwrap(),
            Some(v("2.0.0"))
        );
    }

    #[test]
    fn test_pre_major_feature_bumps_patch() {
        let analyzer = analyzer(BumpPolicy {
            bump_minor_pre_major: false,
            bump_patch_for_minor_pre_major: true,
        });
        assert_eq!(
            analyzer.next_version(&v("0.4.2"), &commits(&["feat: add"])).unwrap(),
            Some(v("0.4.3"))
        );
        // the patch flag never softens a breaking change
        assert_eq!(
            analyzer.next_version(&v("0.4.2"), &commits(&["feat!: rework"])).unwrap(),
            Some(v("1.0.0"))
        );
    }

    #[test]
    fn test_pre_major_both_flags() {
        let analyzer = analyzer(BumpPolicy {
            bump_minor_pre_major: true,
            bump_patch_for_minor_pre_major: true,
        });
        assert_eq!(
            analyzer
                .next_version(&v("0.4.2"), &commits(&["fix!: drop api", "feat: add"]))
                .unwrap(),
            Some(v("0.5.0"))
        );
        assert_eq!(
            analyzer.next_version(&v("0.4.2"), &commits(&["feat: add", "fix: repair"])).unwrap(),
            Some(v("0.4.3"))
        );
        assert_eq!(
            analyzer.next_version(&v("0.4.2"), &commits(&["fix: repair"])).unwrap(),
            Some(v("0.4.3"))
        );
    }

    #[test]
    fn test_prerelease_is_finalized_once() {
        let analyzer = analyzer(BumpPolicy::default());
        let current = v("1.3.0-rc.1");
        assert_eq!(
            analyzer.next_version(&current, &commits(&["feat!: rework"])).unwrap(),
            Some(v("1.3.0"))
        );
        assert_eq!(
            analyzer.next_version(&current, &commits(&["fix: repair"])).unwrap(),
            Some(v("1.3.0"))
        );
    }

    #[test]
    fn test_bump_is_monotonic() {
        let policies = [
            BumpPolicy::default(),
            BumpPolicy {
                bump_minor_pre_major: true,
                bump_patch_for_minor_pre_major: true,
            },
        ];
        let sets = [
            commits(&["fix: a"]),
            commits(&["feat: a", "chore: b"]),
            commits(&["refactor!: a"]),
            commits(&["docs: a", "fix: b", "feat: c", "feat!: d"]),
        ];
        for policy in policies {
            let analyzer = analyzer(policy);
            for current in ["0.0.0", "0.3.7", "1.0.0", "4.5.6-beta.2"] {
                let current = v(current);
                for set in &sets {
                    let next = analyzer.next_version(&current, set).unwrap().unwrap();
                    assert!(next > current, "{} -> {}", current, next);
                }
            }
        }
    }

    #[test]
    fn test_exhausted_version_is_an_error() {
        let analyzer = analyzer(BumpPolicy::default());
        let current = v("18446744073709551615.0.0");
        assert!(matches!(
            analyzer.next_version(&current, &commits(&["feat!: x"])),
            Err(ReleaseError::Version(_))
        ));
    }
}
