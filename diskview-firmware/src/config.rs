//! Configuration loading
//!
//! The firmware carries one configuration, `diskview.toml`, embedded at
//! compile time. build.rs has already validated it, so a parse failure
//! here means the parser and the validator disagree.

use defmt::*;

use diskview_core::config::{parse_config, AppConfig, FailurePolicy};

/// Parse the embedded configuration, falling back to defaults
pub fn load(source: &str) -> AppConfig {
    let config = match parse_config(source) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using default configuration");
            AppConfig::default()
        }
    };

    info!(
        "Storage: {}{} ({})",
        config.storage.volume.as_str(),
        config.storage.file.as_str(),
        match config.storage.policy {
            FailurePolicy::Silent => "fail-silent",
            FailurePolicy::Visible => "fail-visible",
        }
    );
    debug!("Timing: {}", config.timing);

    config
}
