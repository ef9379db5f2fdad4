//! Search command - rank photos by label text

use crate::browse::BrowseSession;
use crate::output::{self, AssetSummary};
use crate::search::Searcher;
use crate::PhotagError;

type Result<T> = std::result::Result<T, PhotagError>;

/// Execute the search command
///
/// # Errors
/// Returns an error if the query is blank, the searcher fails or JSON output fails.
pub async fn execute(
    session: &mut BrowseSession,
    searcher: &dyn Searcher,
    query: &str,
    limit: usize,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let found = session.load_search(searcher, query, limit).await?;

    if json {
        let summaries: Vec<AssetSummary> = session.projection().iter().map(AssetSummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if found == 0 {
        if !quiet {
            println!("No photos match '{}'.", query.trim());
        }
        return Ok(());
    }

    if !quiet {
        println!("Matches for '{}':", query.trim());
    }
    for asset in session.projection() {
        println!("{}", output::asset_line(asset, quiet));
    }
    Ok(())
}
