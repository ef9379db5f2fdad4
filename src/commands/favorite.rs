//! Favorite command - mark or unmark photos

use super::{report, select_in_library};
use crate::browse::BrowseSession;
use crate::PhotagError;

type Result<T> = std::result::Result<T, PhotagError>;

/// Execute the favorite command
///
/// # Errors
/// Returns an error if an identifier is unknown or the store refused every change.
pub async fn execute(session: &mut BrowseSession, ids: &[String], value: bool, quiet: bool) -> Result<()> {
    select_in_library(session, ids).await?;
    let outcome = session.favorite_selection(value).await;
    report(&outcome, quiet)
}
