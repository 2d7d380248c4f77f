use crate::changelog::merge_entry;
use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::updater::ContentUpdater;
use regex::Regex;
use std::sync::LazyLock;
use toml_edit::{DocumentMut, Item, Value};

static SEMVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?")
        .expect("valid semver pattern")
});

const INLINE_MARKER: &str = "x-release-please-version";
const BLOCK_START: &str = "x-release-please-start-version";
const BLOCK_END: &str = "x-release-please-end";

/// Merges a rendered entry into a changelog document
pub struct ChangelogUpdater<'a> {
    pub entry: &'a str,
}

impl ContentUpdater for ChangelogUpdater<'_> {
    fn update_content(&self, _path: &str, content: &str) -> Result<String> {
        Ok(merge_entry(content, self.entry))
    }
}

/// Replaces versions on annotated lines of any text file.
///
/// A line containing `x-release-please-version`, or any line between
/// `x-release-please-start-version` and `x-release-please-end`, gets every
/// semantic version on it replaced. All other bytes are kept as they are.
pub struct GenericVersionUpdater<'a> {
    pub version: &'a Version,
}

impl ContentUpdater for GenericVersionUpdater<'_> {
    fn update_content(&self, _path: &str, content: &str) -> Result<String> {
        let replacement = self.version.to_string();
        let mut output = String::with_capacity(content.len());
        let mut in_block = false;

        for line in content.split_inclusive('\n') {
            if line.contains(BLOCK_START) {
                in_block = true;
                output.push_str(line);
                continue;
            }
            if line.contains(BLOCK_END) {
                in_block = false;
                output.push_str(line);
                continue;
            }

            if in_block || line.contains(INLINE_MARKER) {
                output.push_str(&SEMVER_RE.replace_all(line, replacement.as_str()));
            } else {
                output.push_str(line);
            }
        }

        Ok(output)
    }
}

/// Sets `package.version` (or `workspace.package.version`) in a Cargo manifest,
/// keeping comments, ordering and whitespace intact
pub struct CargoTomlUpdater<'a> {
    pub version: &'a Version,
}

impl ContentUpdater for CargoTomlUpdater<'_> {
    fn update_content(&self, path: &str, content: &str) -> Result<String> {
        let mut doc = content
            .parse::<DocumentMut>()
            .map_err(|e| ReleaseError::splice(path, format!("invalid TOML: {}", e)))?;

        let has_package_version = doc
            .get("package")
            .and_then(|p| p.get("version"))
            .is_some();
        let slot = if has_package_version {
            doc.get_mut("package").and_then(|p| p.get_mut("version"))
        } else {
            doc.get_mut("workspace")
                .and_then(|w| w.get_mut("package"))
                .and_then(|p| p.get_mut("version"))
        };
        let item = slot.ok_or_else(|| ReleaseError::splice(path, "no package.version field"))?;

        let Some(current) = item.as_value().filter(|v| v.is_str()) else {
            return Err(ReleaseError::splice(
                path,
                "package.version is not a string (inherited from the workspace?)",
            ));
        };

        let decor = current.decor().clone();
        let mut replacement = Value::from(self.version.to_string());
        *replacement.decor_mut() = decor;
        *item = Item::Value(replacement);

        Ok(doc.to_string())
    }
}
