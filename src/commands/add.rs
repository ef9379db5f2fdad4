//! Add command - register photo files

use crate::store::{Imported, LibraryStore};
use crate::PhotagError;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, PhotagError>;

/// Expand glob patterns; plain paths are passed through unchanged
///
/// # Errors
/// Returns `PhotagError::InvalidInput` for a malformed pattern or one that matches nothing.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let matches = glob::glob(pattern)
            .map_err(|e| PhotagError::InvalidInput(format!("Invalid pattern '{pattern}': {e}")))?;
        let before = paths.len();
        paths.extend(matches.filter_map(std::result::Result::ok).filter(|p| p.is_file()));
        if paths.len() == before {
            return Err(PhotagError::InvalidInput(format!("No files match '{pattern}'")));
        }
    }
    Ok(paths)
}

/// Execute the add command
///
/// # Errors
/// Returns an error if a pattern is invalid or a file cannot be registered.
pub fn execute(library: &LibraryStore, patterns: &[String], quiet: bool) -> Result<Vec<Imported>> {
    let paths = expand_patterns(patterns)?;
    let mut imported = Vec::with_capacity(paths.len());

    for path in paths {
        let entry = library.import(&path)?;
        if quiet {
            println!("{}", entry.identifier);
        } else if entry.created {
            println!("Added {} as {}", entry.path.display(), entry.identifier);
        } else {
            println!("Already registered: {} ({})", entry.path.display(), entry.identifier);
        }
        imported.push(entry);
    }

    library.database().flush()?;
    Ok(imported)
}
