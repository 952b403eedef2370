//! Config command handlers: show effective configuration.

use anyhow::Result;

use crate::app_config::{EffectiveConfig, LoadedConfig};

pub fn run_config_show_command(loaded: &LoadedConfig, effective: &EffectiveConfig) -> Result<()> {
    let resolved_path = loaded.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!(
        "base_url = {} ({})",
        effective.catalog.base_url,
        effective.base_url_source.as_str()
    );
    println!("subject = {}", effective.subject);
    println!(
        "request_timeout_ms = {}",
        effective.catalog.request_timeout.as_millis()
    );
    println!(
        "detail_timeout_ms = {}",
        effective.catalog.detail_timeout.as_millis()
    );
    println!(
        "detail_display_timeout_ms = {}",
        effective.display_timeout.as_millis()
    );
    println!(
        "max_attempts = {}",
        effective.catalog.retry_policy.max_attempts()
    );
    println!("verbosity = {}", effective.verbosity.as_str());

    Ok(())
}
