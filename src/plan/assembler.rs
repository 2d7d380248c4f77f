use crate::analyzer::VersionAnalyzer;
use crate::boundary::{BoundaryWarning, HistoryWindow};
use crate::changelog::{ChangelogSynthesizer, EntryHeading};
use crate::client::{RemoteTag, Snapshot};
use crate::config::{Config, ExtraFileKind, MissingBoundaryPolicy};
use crate::domain::{ClassifiedCommit, RawCommit, ReleaseBranch, TagName, TagSeparator, Version};
use crate::error::{ReleaseError, Result};
use crate::observer::ReleaseObserver;
use crate::plan::{
    render_body, render_title, NothingReason, NothingToRelease, PlanOutcome, ReleasePlan,
};
use crate::updater::{
    CargoTomlUpdater, ChangelogUpdater, ContentUpdater, FileStager, FileUpdate,
    GenericVersionUpdater,
};
use chrono::NaiveDate;

/// Assembles release plans from captured repository state.
///
/// Planning is a pure function of the snapshot, the configuration and the
/// release date: the same inputs always give the same outcome. Warnings go
/// to the injected observer.
pub struct ReleasePlanner<'a> {
    config: &'a Config,
    observer: &'a dyn ReleaseObserver,
    analyzer: VersionAnalyzer,
    synthesizer: ChangelogSynthesizer,
    separator: TagSeparator,
}

impl<'a> ReleasePlanner<'a> {
    /// Validate `config` and build a planner around it
    pub fn new(config: &'a Config, observer: &'a dyn ReleaseObserver) -> Result<Self> {
        config.validate()?;

        Ok(ReleasePlanner {
            config,
            observer,
            analyzer: VersionAnalyzer::from_config(config),
            synthesizer: ChangelogSynthesizer::from_config(config),
            separator: config.tag_separator()?,
        })
    }

    pub fn plan(&self, snapshot: &Snapshot, date: NaiveDate) -> Result<PlanOutcome> {
        let previous = self.previous_release(&snapshot.tags);
        let window = HistoryWindow::walk(
            &snapshot.commits,
            previous.as_ref().map(|(_, remote)| remote.sha.as_str()),
        );

        let (previous_tag, eligible) = match (window, previous) {
            (HistoryWindow::BoundaryMissing, Some((_, remote))) => {
                self.missing_boundary(remote, &snapshot.commits)?
            }
            (window, previous) => (
                previous.map(|(tag, _)| tag),
                window.commits().unwrap_or_default(),
            ),
        };

        if eligible.is_empty() {
            if let Some(tag) = &previous_tag {
                self.observer.warn(&BoundaryWarning::NoNewCommits {
                    tag: tag.to_string(),
                });
            }
            return Ok(nothing(NothingReason::NoNewCommits, previous_tag));
        }

        let commits = self.classify(eligible);
        if commits.is_empty() {
            return Ok(nothing(NothingReason::NoConventionalCommits, previous_tag));
        }

        let base = previous_tag
            .as_ref()
            .map(|tag| tag.version().clone())
            .unwrap_or_default();
        let Some(version) = self.analyzer.next_version(&base, &commits)? else {
            self.observer.note(&format!(
                "{} conventional commits since {}, none release-worthy",
                commits.len(),
                previous_tag
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "the beginning of history".to_string())
            ));
            return Ok(nothing(NothingReason::NoReleasableChanges, previous_tag));
        };

        let current_tag = TagName::new(
            version.clone(),
            self.config.tag_component(),
            self.separator,
            self.config.tagging.include_v,
        )?;

        let heading = EntryHeading {
            version: &version,
            previous_tag: previous_tag.as_ref(),
            current_tag: &current_tag,
            date,
        };
        let changelog_entry = self.synthesizer.entry(&heading, &commits);

        let component = self.config.component.as_deref();
        let pr_title = render_title(
            self.config.title_pattern(),
            &snapshot.target_branch,
            component,
            &version,
        );
        let pr_body = render_body(
            &self.config.pull_request.header,
            &changelog_entry,
            &self.config.pull_request.footer,
        );
        let head_branch = ReleaseBranch::new(snapshot.target_branch.as_str(), component).to_string();

        let updates = self.stage_updates(snapshot, &version, &changelog_entry, &pr_title)?;

        self.observer.note(&format!(
            "Planned {} with {} commits and {} file updates",
            current_tag,
            commits.len(),
            updates.len()
        ));

        Ok(PlanOutcome::Planned(ReleasePlan {
            version,
            previous_tag,
            current_tag,
            changelog_entry,
            pr_title,
            pr_body,
            head_branch,
            base_branch: snapshot.target_branch.clone(),
            updates,
            commits,
        }))
    }

    /// Newest parseable tag for the configured component.
    ///
    /// An unparseable tag is treated as absent for this lookup only: it is
    /// reported and the search continues with older tags. When no tag
    /// parses, the release is an initial release.
    fn previous_release<'s>(&self, tags: &'s [RemoteTag]) -> Option<(TagName, &'s RemoteTag)> {
        let component = self.config.tag_component();

        for remote in tags {
            let Some(tag) = TagName::parse(&remote.name) else {
                self.observer.warn(&BoundaryWarning::UnparsableTag {
                    tag: remote.name.clone(),
                    reason: "not a release tag".to_string(),
                });
                continue;
            };
            if tag.component() == component {
                return Some((tag, remote));
            }
        }
        None
    }

    fn missing_boundary<'s>(
        &self,
        remote: &RemoteTag,
        commits: &'s [RawCommit],
    ) -> Result<(Option<TagName>, &'s [RawCommit])> {
        match self.config.behavior.missing_boundary {
            MissingBoundaryPolicy::Fail => Err(ReleaseError::BoundaryNotFound {
                tag: remote.name.clone(),
                sha: remote.sha.clone(),
                searched: commits.len(),
            }),
            MissingBoundaryPolicy::InitialRelease => {
                self.observer.warn(&BoundaryWarning::BoundaryNotFound {
                    tag: remote.name.clone(),
                    sha: remote.sha.clone(),
                    searched: commits.len(),
                });
                Ok((None, commits))
            }
        }
    }

    fn classify(&self, commits: &[RawCommit]) -> Vec<ClassifiedCommit> {
        commits
            .iter()
            .filter_map(|raw| {
                let classified = raw.classify();
                if classified.is_none() {
                    self.observer.warn(&BoundaryWarning::NonConventionalCommit {
                        sha: raw.sha.clone(),
                        header: raw.message.lines().next().unwrap_or_default().to_string(),
                    });
                }
                classified
            })
            .collect()
    }

    fn stage_updates(
        &self,
        snapshot: &Snapshot,
        version: &Version,
        entry: &str,
        message: &str,
    ) -> Result<Vec<FileUpdate>> {
        let stager = FileStager::new(message);
        let mut updates = Vec::new();

        let changelog = &self.config.changelog.path;
        let template = self.synthesizer.template();
        if let Some(update) = stager.stage(
            changelog,
            snapshot.file(changelog),
            Some(&template),
            &ChangelogUpdater { entry },
        )? {
            updates.push(update);
        }

        for extra in &self.config.extra_files {
            let generic = GenericVersionUpdater { version };
            let cargo = CargoTomlUpdater { version };
            let updater: &dyn ContentUpdater = match extra.kind {
                ExtraFileKind::Generic => &generic,
                ExtraFileKind::CargoToml => &cargo,
            };

            match stager.stage(
                &extra.path,
                snapshot.file(&extra.path),
                extra.template.as_deref(),
                updater,
            )? {
                Some(update) => updates.push(update),
                None => self.observer.warn(&BoundaryWarning::MissingFile {
                    path: extra.path.clone(),
                }),
            }
        }

        Ok(updates)
    }
}

fn nothing(reason: NothingReason, previous_tag: Option<TagName>) -> PlanOutcome {
    PlanOutcome::NothingToRelease(NothingToRelease {
        reason,
        previous_tag,
    })
}
