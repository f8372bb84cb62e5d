//! Config command handlers

use anyhow::{bail, Result};
use std::path::PathBuf;

use shelf_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load()?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": Config::config_file_path(),
                    "data_dir": config.data_dir,
                    "sync_url": config.sync_url,
                    "sync_enabled": config.sync_enabled,
                })
            );
        }
        _ => {
            println!("Config file: {}", Config::config_file_path().display());
            println!();
            println!("data_dir     = {}", config.data_dir.display());
            println!(
                "sync_url     = {}",
                config.sync_url.as_deref().unwrap_or("(not set)")
            );
            println!("sync_enabled = {}", config.sync_enabled);
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load()?;

    match key.as_str() {
        "data_dir" => config.data_dir = PathBuf::from(&value),
        "sync_url" => {
            config.sync_url = if value.is_empty() { None } else { Some(value.clone()) };
        }
        "sync_enabled" => {
            config.sync_enabled = value.eq_ignore_ascii_case("true") || value == "1";
        }
        _ => bail!(
            "Unknown config key '{}'. Valid keys: data_dir, sync_url, sync_enabled",
            key
        ),
    }

    config.save()?;
    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
