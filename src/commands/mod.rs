//! CLI command handlers.

mod config;
mod list;
mod open;
mod show;

use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_core::{CatalogSource, OpenLibraryClient};

use crate::app_config::EffectiveConfig;

pub use config::run_config_show_command;
pub use list::run_list_command;
pub use open::run_open_command;
pub use show::run_show_command;

/// Builds the production catalog client for the effective configuration.
fn catalog_source(config: &EffectiveConfig) -> Result<Arc<dyn CatalogSource>> {
    let client = OpenLibraryClient::with_config(config.catalog.clone())
        .context("Failed to initialize the catalog client")?;
    Ok(Arc::new(client))
}
