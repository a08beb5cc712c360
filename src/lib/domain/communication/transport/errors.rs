//! Transport errors

use thiserror::Error;

use super::ApiFailure;

/// The transport could not be built from its configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No endpoint was configured
    #[error("an endpoint is required")]
    MissingEndpoint,

    /// No access key was configured
    #[error("an access key is required")]
    MissingAccessKey,

    /// The access key is not valid base64
    #[error("the access key is not valid base64")]
    InvalidAccessKey,

    /// The DSN could not be parsed
    #[error("invalid DSN: {0}")]
    InvalidDsn(String),

    /// No transport is registered for the DSN scheme
    #[error("the \"{scheme}\" scheme is not supported; supported schemes are: {supported}")]
    UnsupportedScheme {
        /// The scheme that was asked for
        scheme: String,

        /// Comma separated list of supported schemes
        supported: String,
    },
}

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The transport is misconfigured
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The request never produced a response
    #[error("could not reach the remote server: {0}")]
    Transport(anyhow::Error),

    /// The provider accepted the request but its response could not be interpreted
    #[error("unexpected response from the remote server: {0}")]
    Protocol(String),

    /// The provider rejected the request
    #[error("{0}")]
    Rejected(ApiFailure),

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<reqwest::Error> for MailerError {
    fn from(err: reqwest::Error) -> Self {
        MailerError::Transport(err.into())
    }
}
