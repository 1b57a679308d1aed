// ABOUTME: Configuration types and parsing for assetship.yml.
// ABOUTME: Supplies defaults for concurrency, retries, paging, and the store connection.

mod env_value;

pub use env_value::EnvValue;

use crate::batch::DEFAULT_CONCURRENCY;
use crate::deploy::DEFAULT_CONTAINER;
use crate::error::{Error, Result};
use crate::listing::DEFAULT_MAX_PAGES;
use crate::retry::{Backoff, DEFAULT_MAX_ATTEMPTS, RetryPolicy};
use crate::store::{BackendOptions, DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "assetship.yml";
pub const CONFIG_FILENAME_ALT: &str = "assetship.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".assetship/config.yml";

/// Settings shared by the deploy and cleanup commands.
///
/// Every field is optional in the file; command-line flags take precedence
/// over the file, and the file over the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub connection_string: Option<EnvValue>,

    #[serde(default = "default_container")]
    pub container: String,

    /// Number of concurrent storage operations.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Attempts per storage operation.
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default)]
    pub retry_backoff: Backoff,

    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_retries() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection_string: None,
            container: default_container(),
            chunk_size: default_chunk_size(),
            retries: default_retries(),
            retry_backoff: Backoff::None,
            max_pages: default_max_pages(),
            page_size: default_page_size(),
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, if any.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("using config file {}", path.display());
                return Self::load(path).map(Some);
            }
        }

        Ok(None)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("chunk_size", self.chunk_size),
            ("retries", self.retries as usize),
            ("max_pages", self.max_pages),
            ("page_size", self.page_size),
        ];

        for (name, value) in positive {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be at least 1")));
            }
        }

        if self.container.trim().is_empty() {
            return Err(Error::InvalidConfig("container cannot be empty".to_string()));
        }

        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries).with_backoff(self.retry_backoff)
    }

    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            page_size: self.page_size,
            request_timeout: self.request_timeout,
        }
    }

    /// The configured connection string, resolving environment references.
    pub fn connection_string(&self) -> Result<Option<String>> {
        self.connection_string
            .as_ref()
            .map(EnvValue::resolve)
            .transpose()
    }
}
