//! Azure Communication Services email configuration

use std::fmt;

use clap::{ArgAction, Parser};

use crate::domain::communication::transport::ConfigurationError;

use super::signer::{signing_host, split_scheme};

/// The API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "2023-03-31";

/// Azure email configuration
#[derive(Clone, Parser)]
pub struct AzureConfig {
    /// The communication resource, e.g. `https://my-acs.communication.azure.com`
    #[clap(long, env = "AZURE_EMAIL_ENDPOINT")]
    pub endpoint: String,

    /// The base64 encoded primary or secondary access key of the resource
    #[clap(long, env = "AZURE_EMAIL_ACCESS_KEY", hide_env_values = true)]
    pub access_key: String,

    /// The version of the email API to call
    #[clap(long, env = "AZURE_EMAIL_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Let the provider track opens and clicks
    #[clap(
        long,
        env = "AZURE_EMAIL_ENGAGEMENT_TRACKING",
        default_value = "true",
        action = ArgAction::Set
    )]
    pub engagement_tracking: bool,
}

impl AzureConfig {
    /// Create a configuration with the default API version and tracking enabled
    pub fn new(endpoint: &str, access_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            access_key: access_key.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            engagement_tracking: true,
        }
    }

    /// Use a different API version. A blank version keeps the default.
    pub fn with_api_version(mut self, api_version: &str) -> Self {
        let api_version = api_version.trim();
        if !api_version.is_empty() {
            self.api_version = api_version.to_string();
        }
        self
    }

    /// Enable or disable engagement tracking
    pub fn with_engagement_tracking(mut self, enabled: bool) -> Self {
        self.engagement_tracking = enabled;
        self
    }
}

impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &"********")
            .field("api_version", &self.api_version)
            .field("engagement_tracking", &self.engagement_tracking)
            .finish()
    }
}

/// Where requests are sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    host: String,
}

impl Endpoint {
    /// Parse a host or URL. A bare host is reached over `https`.
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let raw = raw.trim();
        let host = signing_host(raw);

        if host.is_empty() {
            return Err(ConfigurationError::MissingEndpoint);
        }

        let scheme = split_scheme(raw).0.unwrap_or("https");
        let base_url = format!("{scheme}://{host}");

        Ok(Self {
            base_url,
            host: host.to_string(),
        })
    }

    /// The scheme and host, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The host, as signed
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url)
    }
}
