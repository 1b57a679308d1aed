// ABOUTME: Azure Blob Storage connection using object_store's MicrosoftAzureBuilder.
// ABOUTME: Parses storage account connection strings into builder settings.

use super::error::ConfigureSnafu;
use super::{BackendOptions, ObjectStoreBackend, StoreError};
use object_store::azure::MicrosoftAzureBuilder;
use object_store::{ClientOptions, RetryConfig};
use snafu::ResultExt;
use std::str::FromStr;

/// Settings extracted from an Azure storage account connection string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionString {
    pub account_name: Option<String>,
    pub account_key: Option<String>,
    pub blob_endpoint: Option<String>,
    pub sas_token: Option<String>,
    pub use_development_storage: bool,
}

impl ConnectionString {
    /// Parse `Key=Value;Key=Value` pairs. Keys are matched case-insensitively
    /// and unknown keys (such as `EndpointSuffix`) are ignored.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let mut parsed = ConnectionString::default();

        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) =
                pair.split_once('=')
                    .ok_or_else(|| StoreError::InvalidConnectionString {
                        message: format!("expected Key=Value, got '{pair}'"),
                    })?;
            let value = value.to_string();

            if key.eq_ignore_ascii_case("AccountName") {
                parsed.account_name = Some(value);
            } else if key.eq_ignore_ascii_case("AccountKey") {
                parsed.account_key = Some(value);
            } else if key.eq_ignore_ascii_case("BlobEndpoint") {
                parsed.blob_endpoint = Some(value);
            } else if key.eq_ignore_ascii_case("SharedAccessSignature") {
                parsed.sas_token = Some(value);
            } else if key.eq_ignore_ascii_case("UseDevelopmentStorage") {
                parsed.use_development_storage = value.eq_ignore_ascii_case("true");
            }
        }

        if parsed.account_name.is_none() && !parsed.use_development_storage {
            return Err(StoreError::InvalidConnectionString {
                message: "missing AccountName".to_string(),
            });
        }

        Ok(parsed)
    }

    fn sas_pairs(&self) -> Option<Vec<(String, String)>> {
        self.sas_token.as_ref().map(|sas| {
            sas.trim_start_matches('?')
                .split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| match pair.split_once('=') {
                    Some((k, v)) => (k.to_string(), v.to_string()),
                    None => (pair.to_string(), String::new()),
                })
                .collect()
        })
    }
}

impl FromStr for ConnectionString {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConnectionString::parse(s)
    }
}

/// Build a store for `container` in the account described by `connection`.
///
/// The builder's own retries are disabled; attempts are governed by
/// [`crate::retry::invoke`].
pub fn connect_azure(
    connection: &ConnectionString,
    container: &str,
    options: &BackendOptions,
) -> Result<ObjectStoreBackend, StoreError> {
    let mut builder = MicrosoftAzureBuilder::new()
        .with_container_name(container)
        .with_retry(RetryConfig {
            max_retries: 0,
            ..Default::default()
        });

    if connection.use_development_storage {
        builder = builder.with_use_emulator(true);
    }

    if let Some(account) = &connection.account_name {
        builder = builder.with_account(account);
    }

    if let Some(key) = &connection.account_key {
        builder = builder.with_access_key(key);
    }

    if let Some(pairs) = connection.sas_pairs() {
        builder = builder.with_sas_authorization(pairs);
    }

    if let Some(endpoint) = &connection.blob_endpoint {
        builder = builder.with_endpoint(endpoint.clone());
    }

    if let Some(timeout) = options.request_timeout {
        builder = builder.with_client_options(ClientOptions::new().with_timeout(timeout));
    }

    let store = builder.build().context(ConfigureSnafu)?;
    tracing::debug!(container, "connected to azure blob storage");

    Ok(ObjectStoreBackend::new(store).with_page_size(options.page_size))
}
