// ABOUTME: Shared helper for resolving settings and connecting to the store.
// ABOUTME: Merges command-line flags over the config file before connecting.

use crate::cli::StoreArgs;
use assetship::config::Config;
use assetship::deploy::{Connected, DeploymentManager, DeploymentSettings};
use assetship::error::{Error, Result};
use assetship::output::Output;
use assetship::store::{ConnectionString, connect_azure};
use std::env;
use std::sync::Arc;

/// Load the config named by `--config`, or discover one in the working directory.
fn load_config(args: &StoreArgs) -> Result<Config> {
    match &args.config {
        Some(path) => Config::load(path),
        None => {
            let cwd = env::current_dir()?;
            Ok(Config::discover(&cwd)?.unwrap_or_default())
        }
    }
}

/// Apply command-line overrides to the config file values.
pub fn resolve_config(args: &StoreArgs, max_pages: Option<usize>) -> Result<Config> {
    let mut config = load_config(args)?;

    if let Some(container) = &args.container {
        config.container = container.clone();
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(retries) = args.retries {
        config.retries = retries;
    }
    if let Some(max_pages) = max_pages {
        config.max_pages = max_pages;
    }

    config.validate()?;
    Ok(config)
}

/// Build the deployment settings for a run from the resolved config.
pub fn settings(args: &StoreArgs, config: &Config) -> DeploymentSettings {
    DeploymentSettings {
        current_version: args.current_version.clone(),
        container: config.container.clone(),
        concurrency: config.chunk_size,
        retry: config.retry_policy(),
        max_pages: config.max_pages,
        dry_run: args.dry_run,
    }
}

/// Connect a deployment manager to the configured storage container.
pub fn connect(
    args: &StoreArgs,
    config: &Config,
    output: &Output,
) -> Result<DeploymentManager<Connected>> {
    let raw = match &args.connection_string {
        Some(raw) => raw.clone(),
        None => config
            .connection_string()?
            .ok_or(Error::MissingConnectionString)?,
    };

    let connection = ConnectionString::parse(&raw)?;
    output.progress(&format!("  → Connecting to container {}...", config.container));
    let store = connect_azure(&connection, &config.container, &config.backend_options())?;

    Ok(DeploymentManager::new(settings(args, config)).connect(Arc::new(store)))
}
