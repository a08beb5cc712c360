//! Creates Azure transports from `azure://` and `azure+api://` DSNs

use std::sync::Arc;

use crate::{
    domain::communication::transport::{ConfigurationError, MailerError, Transport},
    infrastructure::{
        email::{
            dsn::Dsn,
            registry::{unsupported_scheme, TransportFactory},
        },
        http::HttpExecutor,
    },
};

use super::{AzureConfig, AzureTransport, DEFAULT_API_VERSION};

const SCHEMES: &[&str] = &["azure", "azure+api"];

/// Creates [`AzureTransport`]s sharing one HTTP executor
#[derive(Debug)]
pub struct AzureTransportFactory<H: HttpExecutor> {
    client: Arc<H>,
}

impl<H: HttpExecutor> AzureTransportFactory<H> {
    /// Create a factory
    pub fn new(client: Arc<H>) -> Self {
        Self { client }
    }

    /// Read the transport configuration from a DSN.
    ///
    /// The access key is the DSN password, or the user when there is no password. The
    /// `api-version` and `tracking` options are optional.
    pub fn config(&self, dsn: &Dsn) -> Result<AzureConfig, ConfigurationError> {
        if !self.supports(dsn) {
            return Err(unsupported_scheme(dsn, SCHEMES));
        }

        if dsn.host() == "default" {
            return Err(ConfigurationError::MissingEndpoint);
        }

        let access_key = dsn
            .password()
            .or(dsn.user())
            .ok_or(ConfigurationError::MissingAccessKey)?;

        let endpoint = match dsn.port() {
            Some(port) => format!("{}:{}", dsn.host(), port),
            None => dsn.host().to_string(),
        };

        let tracking = match dsn.option("tracking") {
            None => true,
            Some(raw) => parse_flag(raw).ok_or_else(|| {
                ConfigurationError::InvalidDsn(format!("\"{raw}\" is not a valid tracking flag"))
            })?,
        };

        Ok(AzureConfig::new(&endpoint, access_key)
            .with_api_version(dsn.option("api-version").unwrap_or(DEFAULT_API_VERSION))
            .with_engagement_tracking(tracking))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl<H: HttpExecutor> TransportFactory for AzureTransportFactory<H> {
    fn schemes(&self) -> &'static [&'static str] {
        SCHEMES
    }

    fn create(&self, dsn: &Dsn) -> Result<Arc<dyn Transport>, MailerError> {
        let config = self.config(dsn)?;

        Ok(Arc::new(AzureTransport::new(&config, self.client.clone())?))
    }
}
