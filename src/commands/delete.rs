//! Delete command - remove photos from the library and disk

use super::{report, select_in_library};
use crate::browse::BrowseSession;
use crate::PhotagError;
use dialoguer::{Confirm, theme::ColorfulTheme};

type Result<T> = std::result::Result<T, PhotagError>;

/// Execute the delete command
///
/// Prompts for confirmation unless `yes` or `quiet` is set.
///
/// # Errors
/// Returns an error if an identifier is unknown, the prompt fails or the store
/// refused the deletion.
pub async fn execute(session: &mut BrowseSession, ids: &[String], yes: bool, quiet: bool) -> Result<()> {
    select_in_library(session, ids).await?;

    if !yes && !quiet {
        let count = session.selection().len();
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Permanently delete {count} photo(s) and their files?"))
            .default(false)
            .interact()
            .map_err(|e| PhotagError::InvalidInput(format!("Failed to read input: {e}")))?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let outcome = session.delete_selection().await;
    report(&outcome, quiet)
}
