//! Label command - assign a class label to photos

use super::select_in_library;
use crate::browse::{AssignOutcome, BrowseSession, SkipReason};
use crate::PhotagError;

type Result<T> = std::result::Result<T, PhotagError>;

/// Execute the label command
///
/// # Errors
/// Returns an error if an identifier is unknown, the label is blank or the
/// labels cannot be persisted.
pub async fn execute(session: &mut BrowseSession, label: &str, ids: &[String], quiet: bool) -> Result<usize> {
    select_in_library(session, ids).await?;
    session.set_label_input(label);

    match session.assign_label()? {
        AssignOutcome::Applied { label, count } => {
            if !quiet {
                println!("Labelled {count} photo(s) as '{label}'");
            }
            Ok(count)
        }
        AssignOutcome::Skipped(SkipReason::BlankLabel) => {
            Err(PhotagError::InvalidInput("Label is empty".into()))
        }
        AssignOutcome::Skipped(SkipReason::EmptySelection) => {
            Err(PhotagError::InvalidInput("No photos selected".into()))
        }
    }
}
