//! Photag CLI application entry point
//!
//! # Usage
//!
//! ```bash
//! # Register photos
//! photag add ~/Pictures/*.jpg
//!
//! # List the library (default command)
//! photag
//! photag list --label sunset
//!
//! # Label, favorite and delete by identifier
//! photag label sunset 3F2A... 9C1B...
//! photag favorite 3F2A...
//! photag delete 9C1B... --yes
//!
//! # Search labels, render a thumbnail
//! photag search cat --limit 10
//! photag thumbnail 3F2A... --size 256 --fill -o thumb.jpg
//! ```
//!
//! # Configuration
//!
//! On first run, photag prompts for initial setup. Configuration is stored in
//! the user's config directory (`~/.config/photag/config.toml` on Linux) and
//! can be overridden with `PHOTAG_*` environment variables. Logging is
//! controlled by `PHOTAG_LOG` and `PHOTAG_LOG_FORMAT`.

use colored::Colorize;
use photag::{
    PhotagError,
    browse::{BrowseSession, LabelStore},
    cli::{Cli, Commands},
    commands,
    config::PhotagConfig,
    db::Database,
    logging,
    search::LabelSearcher,
    store::{LibraryStore, PhotoStore, TimeoutStore},
};
use std::sync::Arc;

type Result<T> = std::result::Result<T, PhotagError>;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = PhotagConfig::load_or_setup()?;
    logging::init_tracing(config.log_level.as_deref());

    let quiet = cli.quiet || config.quiet;
    let db_path = cli.db.clone().unwrap_or_else(|| config.database.clone());
    let db = Arc::new(Database::open(&db_path)?);
    tracing::debug!(path = %db_path.display(), "Opened library");

    let library = LibraryStore::new(Arc::clone(&db));
    let photos: Arc<dyn PhotoStore> = match config.store_timeout() {
        Some(limit) => Arc::new(TimeoutStore::new(library.clone(), limit)),
        None => Arc::new(library.clone()),
    };
    let labels: Arc<dyn LabelStore> = db.clone();
    let mut session = BrowseSession::new(Arc::clone(&photos), Arc::clone(&labels));

    match cli.get_command() {
        Commands::Add { files } => {
            commands::add(&library, &files, quiet)?;
        }
        Commands::List { label, favorites, json } => {
            commands::list(&mut session, label.as_deref(), favorites, json, quiet).await?;
        }
        Commands::Label { label, ids } => {
            commands::label(&mut session, &label, &ids, quiet).await?;
        }
        Commands::Labels => commands::labels(&db, quiet)?,
        Commands::Favorite { ids, off } => {
            commands::favorite(&mut session, &ids, !off, quiet).await?;
        }
        Commands::Delete { ids, yes } => {
            commands::delete(&mut session, &ids, yes, quiet).await?;
        }
        Commands::Search { query, limit, json } => {
            let searcher = LabelSearcher::new(Arc::clone(&labels));
            let limit = limit.unwrap_or(config.search_limit);
            commands::search(&mut session, &searcher, &query, limit, json, quiet).await?;
        }
        Commands::Thumbnail { id, size, fill, output } => {
            let size = size.unwrap_or(config.thumbnail_size);
            commands::thumbnail(photos.as_ref(), &id, size, fill, &output, quiet).await?;
        }
    }

    Ok(())
}
