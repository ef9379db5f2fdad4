//! Labels command - distinct labels with usage counts

use crate::{PhotagError, db::Database, output};

type Result<T> = std::result::Result<T, PhotagError>;

/// Execute the labels command
///
/// # Errors
/// Returns an error if the labels cannot be read.
pub fn execute(db: &Database, quiet: bool) -> Result<()> {
    let counts = db.label_counts()?;

    if counts.is_empty() {
        if !quiet {
            println!("No labels found in database.");
        }
        return Ok(());
    }

    if !quiet {
        println!("Labels in database:");
    }
    for (label, count) in counts {
        println!("{}", output::label_with_count(&label, count, quiet));
    }
    Ok(())
}
