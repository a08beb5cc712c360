//! Send results

use std::fmt;

use super::MailerError;

/// A structured rejection returned by the provider
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiFailure {
    /// The provider's error code, or `UnexpectedResponse` if the body was not an error envelope
    pub error_code: String,

    /// The provider's error message
    pub error_message: String,

    /// The HTTP status of the response
    pub http_status: u16,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unable to send an email ({}, status {}): {}",
            self.error_code, self.http_status, self.error_message
        )
    }
}

/// The outcome of a single send attempt that reached the provider
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendResult {
    /// The provider accepted the message
    Success {
        /// The identifier the provider assigned to the message
        provider_message_id: String,
    },

    /// The provider rejected the message
    Failure(ApiFailure),
}

impl SendResult {
    /// Whether the provider accepted the message
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Turn a rejection into [`MailerError::Rejected`], returning the message id otherwise
    pub fn into_result(self) -> Result<String, MailerError> {
        match self {
            Self::Success {
                provider_message_id,
            } => Ok(provider_message_id),
            Self::Failure(failure) => Err(MailerError::Rejected(failure)),
        }
    }
}
