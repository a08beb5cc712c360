//! Transport DSNs
//!
//! A DSN selects and configures a transport in one string, e.g.
//! `azure+api://ACCESS_KEY@my-acs.communication.azure.com?tracking=false`.
//! Characters of the key that are not allowed in a URL user part, such as `/`, must be
//! percent-encoded.

use std::{fmt, str::FromStr};

use url::Url;

use crate::domain::communication::transport::ConfigurationError;

/// A parsed transport DSN
#[derive(Clone, PartialEq, Eq)]
pub struct Dsn {
    scheme: String,
    host: String,
    user: Option<String>,
    password: Option<String>,
    port: Option<u16>,
    options: Vec<(String, String)>,
}

impl Dsn {
    /// Create a DSN from its scheme and host
    pub fn new(scheme: &str, host: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            user: None,
            password: None,
            port: None,
            options: Vec::new(),
        }
    }

    /// Parse a DSN string
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let url = Url::parse(raw.trim())
            .map_err(|e| ConfigurationError::InvalidDsn(e.to_string()))?;

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| ConfigurationError::InvalidDsn("a host is required".to_string()))?;

        let user = decode(url.username())?;
        let password = url.password().map(decode).transpose()?.flatten();

        Ok(Self {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            user,
            password,
            port: url.port(),
            options: url.query_pairs().into_owned().collect(),
        })
    }

    /// Set the user
    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    /// Set the password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Add a query option
    pub fn with_option(mut self, name: &str, value: &str) -> Self {
        self.options.push((name.to_string(), value.to_string()));
        self
    }

    /// The scheme, e.g. `azure+api`
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The user part
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// The password part
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// The port
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The last value given for a query option
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

fn decode(raw: &str) -> Result<Option<String>, ConfigurationError> {
    if raw.is_empty() {
        return Ok(None);
    }

    urlencoding::decode(raw)
        .map(|decoded| Some(decoded.into_owned()))
        .map_err(|_| ConfigurationError::InvalidDsn("credentials are not valid UTF-8".to_string()))
}

impl FromStr for Dsn {
    type Err = ConfigurationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl fmt::Debug for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dsn")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("user", &self.user.as_ref().map(|_| "********"))
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("port", &self.port)
            .field("options", &self.options)
            .finish()
    }
}
