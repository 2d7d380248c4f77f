use crate::domain::Version;

/// Fill `{branch}`, `{component}` and `{version}` in a title pattern.
///
/// Without a component, `{component}` and one adjoining space are removed.
pub fn render_title(pattern: &str, branch: &str, component: Option<&str>, version: &Version) -> String {
    let with_component = match component {
        Some(component) => pattern.replace("{component}", component),
        None => pattern
            .replace(" {component}", "")
            .replace("{component} ", "")
            .replace("{component}", ""),
    };
    with_component
        .replace("{branch}", branch)
        .replace("{version}", &version.to_string())
}

/// Pull request body: header, changelog entry and footer separated by rules
pub fn render_body(header: &str, entry: &str, footer: &str) -> String {
    format!(
        "{}\n---\n\n\n{}\n---\n{}\n",
        header.trim_end(),
        entry.trim_end(),
        footer.trim_end()
    )
}
