//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for photag using the `clap` crate.
//!
//! # Commands
//!
//! - **add**: Register photo files (glob patterns accepted)
//! - **list**: Show the library, optionally filtered by label or favorites (default)
//! - **label**: Assign a class label to one or more photos
//! - **labels**: Show distinct labels with usage counts
//! - **favorite**: Mark or unmark photos as favorite
//! - **delete**: Permanently delete photos
//! - **search**: Rank photos by label text
//! - **thumbnail**: Render a thumbnail to a file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "photag")]
#[command(about = "Browse photos and tag them with class labels", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Library database to use instead of the configured one
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Register photo files in the library
    #[command(visible_alias = "a")]
    Add {
        /// Files or glob patterns
        #[arg(value_name = "FILES", required = true, num_args = 1..)]
        files: Vec<String>,
    },

    /// List photos in the library
    #[command(visible_alias = "ls")]
    List {
        /// Only photos carrying this label
        #[arg(short = 'l', long = "label", value_name = "LABEL")]
        label: Option<String>,

        /// Only favorites
        #[arg(short = 'f', long = "favorites")]
        favorites: bool,

        /// Print JSON instead of text
        #[arg(long = "json")]
        json: bool,
    },

    /// Assign a class label to photos
    #[command(visible_alias = "l")]
    Label {
        /// Label text; surrounding whitespace is trimmed
        #[arg(value_name = "LABEL")]
        label: String,

        /// Photo identifiers
        #[arg(value_name = "IDS", required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Show distinct labels with usage counts
    Labels,

    /// Mark photos as favorite
    #[command(visible_alias = "fav")]
    Favorite {
        /// Photo identifiers
        #[arg(value_name = "IDS", required = true, num_args = 1..)]
        ids: Vec<String>,

        /// Remove the favorite mark instead
        #[arg(long = "off")]
        off: bool,
    },

    /// Permanently delete photos, including their files
    #[command(visible_alias = "rm")]
    Delete {
        /// Photo identifiers
        #[arg(value_name = "IDS", required = true, num_args = 1..)]
        ids: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Find photos by label text, best match first
    #[command(visible_alias = "s")]
    Search {
        #[arg(value_name = "QUERY")]
        query: String,

        /// Maximum number of results (overrides config)
        #[arg(short = 'n', long = "limit", value_name = "N")]
        limit: Option<usize>,

        /// Print JSON instead of text
        #[arg(long = "json")]
        json: bool,
    },

    /// Render a JPEG thumbnail of a photo
    #[command(visible_alias = "thumb")]
    Thumbnail {
        #[arg(value_name = "ID")]
        id: String,

        /// Edge length in pixels (overrides config)
        #[arg(short = 's', long = "size", value_name = "N")]
        size: Option<u32>,

        /// Crop to fill the square instead of fitting inside it
        #[arg(long = "fill")]
        fill: bool,

        /// Output file
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to List if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::List {
            label: None,
            favorites: false,
            json: false,
        })
    }
}
