//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs the operation through the browse session or the library.

pub mod add;
pub mod delete;
pub mod favorite;
pub mod label;
pub mod labels;
pub mod list;
pub mod search;
pub mod thumbnail;

// Re-export execute functions for convenience
pub use add::execute as add;
pub use delete::execute as delete;
pub use favorite::execute as favorite;
pub use label::execute as label;
pub use labels::execute as labels;
pub use list::execute as list;
pub use search::execute as search;
pub use thumbnail::execute as thumbnail;

use crate::browse::{ActionOutcome, BrowseSession};
use crate::{PhotagError, output};

type Result<T> = std::result::Result<T, PhotagError>;

/// Load the library and select every given identifier once
///
/// # Errors
/// Returns an error if the labels cannot be read or an identifier is not in the library.
pub(crate) async fn select_in_library(session: &mut BrowseSession, ids: &[String]) -> Result<()> {
    session.load_library().await?;
    for id in ids {
        if !session.selection().contains(id) {
            session.toggle(id)?;
        }
    }
    Ok(())
}

/// Print an action outcome; a total failure becomes an error
pub(crate) fn report(outcome: &ActionOutcome, quiet: bool) -> Result<()> {
    match outcome {
        ActionOutcome::Failed(message) => Err(PhotagError::ActionFailed(message.clone())),
        ActionOutcome::Partial { .. } => {
            eprintln!("{}", output::outcome(outcome));
            Ok(())
        }
        ActionOutcome::Success { .. } => {
            if !quiet {
                println!("{}", output::outcome(outcome));
            }
            Ok(())
        }
    }
}
