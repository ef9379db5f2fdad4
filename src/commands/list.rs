//! List command - show the library or one label's photos

use crate::browse::BrowseSession;
use crate::output::{self, AssetSummary};
use crate::PhotagError;

type Result<T> = std::result::Result<T, PhotagError>;

/// Execute the list command
///
/// # Errors
/// Returns an error if labels cannot be read or JSON output fails.
pub async fn execute(
    session: &mut BrowseSession,
    label: Option<&str>,
    favorites_only: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    match label {
        Some(label) => session.load_labeled(label).await?,
        None => session.load_library().await?,
    };

    let shown: Vec<_> = session
        .projection()
        .iter()
        .filter(|a| !favorites_only || a.is_favorite())
        .collect();

    if json {
        let summaries: Vec<AssetSummary> = shown.iter().map(|a| AssetSummary::from(*a)).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if shown.is_empty() {
        if !quiet {
            println!("No photos found.");
        }
        return Ok(());
    }

    if !quiet {
        println!("Photos ({}):", shown.len());
    }
    for asset in shown {
        println!("{}", output::asset_line(asset, quiet));
    }
    Ok(())
}
