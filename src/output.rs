//! Rendering version lists for the terminal

use clap::ValueEnum;
use serde::Serialize;

use crate::version::types::Version;

/// Output format of version listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct VersionOut<'a> {
    #[serde(flatten)]
    version: &'a Version,
    installed: bool,
    inuse: bool,
}

/// One version name per line, the one in use marked with `*`
pub fn render_text(versions: &[Version], in_use: Option<&str>) -> String {
    versions
        .iter()
        .map(|v| {
            let marker = if Some(v.name()) == in_use { "* " } else { "  " };
            format!("{}{}\n", marker, v.name())
        })
        .collect()
}

/// Pretty JSON array of versions with their packages and local state
pub fn render_json(
    versions: &[Version],
    installed: &[String],
    in_use: Option<&str>,
) -> serde_json::Result<String> {
    let items: Vec<VersionOut<'_>> = versions
        .iter()
        .map(|v| VersionOut {
            version: v,
            installed: installed.iter().any(|name| name == v.name()),
            inuse: Some(v.name()) == in_use,
        })
        .collect();
    serde_json::to_string_pretty(&items)
}

/// Render in the requested format
pub fn render(
    format: OutputFormat,
    versions: &[Version],
    installed: &[String],
    in_use: Option<&str>,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(versions, in_use)),
        OutputFormat::Json => render_json(versions, installed, in_use),
    }
}
