//! Output formatting for CLI display
//!
//! Text lines for assets, labels and action outcomes, plus the serializable
//! summary used for `--json` output.

use crate::asset::Asset;
use crate::browse::ActionOutcome;
use crate::store::MediaType;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// JSON view of one displayed asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSummary {
    pub identifier: String,
    pub label: Option<String>,
    pub favorite: bool,
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Asset> for AssetSummary {
    fn from(asset: &Asset) -> Self {
        let handle = asset.handle();
        Self {
            identifier: asset.identifier().to_string(),
            label: asset.class_label.clone(),
            favorite: asset.is_favorite(),
            media_type: asset.media_type(),
            path: handle.and_then(|h| h.path.clone()),
            created_at: handle.and_then(|h| h.created_at),
        }
    }
}

/// Format an asset with its label for display
#[must_use]
pub fn asset_line(asset: &Asset, quiet: bool) -> String {
    if quiet {
        return asset.identifier().to_string();
    }

    let star = if asset.is_favorite() { "★".yellow().to_string() } else { " ".to_string() };
    let label = asset
        .class_label
        .as_deref()
        .map_or_else(|| "(no label)".dimmed().to_string(), |l| format!("[{}]", l.green()));
    let location = match asset.handle() {
        Some(handle) => handle
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        None => "(missing from library)".red().to_string(),
    };

    format!("{star} {} {label} {location}", asset.identifier().cyan())
        .trim_end()
        .to_string()
}

/// Format a label with usage count
#[must_use]
pub fn label_with_count(label: &str, count: usize, quiet: bool) -> String {
    if quiet {
        label.to_string()
    } else {
        format!("  {label} (used by {count} photo(s))")
    }
}

/// Format an action outcome as a single status line, errors on following lines
#[must_use]
pub fn outcome(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Success { affected_count, details } => {
            format!("{} {details} {affected_count} photo(s)", "✓".green())
        }
        ActionOutcome::Partial { succeeded, failed, errors } => {
            let mut text = format!("{} {succeeded} succeeded, {failed} failed", "!".yellow());
            for error in errors {
                text.push_str(&format!("\n  {error}"));
            }
            text
        }
        ActionOutcome::Failed(message) => format!("{} {message}", "✗".red()),
    }
}
