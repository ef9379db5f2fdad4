//! Interactive setup wizard for first-time configuration

use super::PhotagConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

/// Interactive first-time setup - prompts for library location and thumbnail size
///
/// # Errors
///
/// Returns `ConfigError` if user input cannot be read or the configuration
/// cannot be saved.
pub fn first_time_setup() -> Result<PhotagConfig, ConfigError> {
    println!("Welcome to photag! Let's set up your photo library.\n");

    let defaults = PhotagConfig::default();
    let theme = ColorfulTheme::default();

    let db_path_str: String = Input::with_theme(&theme)
        .with_prompt("Library location")
        .default(defaults.database.to_string_lossy().to_string())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let thumbnail_size: u32 = Input::with_theme(&theme)
        .with_prompt("Default thumbnail size (pixels)")
        .default(defaults.thumbnail_size)
        .validate_with(|size: &u32| if *size > 0 { Ok(()) } else { Err("Size must be positive") })
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let config = PhotagConfig {
        database: PathBuf::from(db_path_str),
        thumbnail_size,
        ..defaults
    };

    config.save()?;

    println!("\nConfiguration saved successfully!");
    Ok(config)
}
