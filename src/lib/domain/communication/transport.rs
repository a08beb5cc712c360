//! Mail transport capability

mod errors;
mod result;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

pub use errors::{ConfigurationError, MailerError};
pub use result::{ApiFailure, SendResult};

use super::{email::Email, envelope::Envelope};

/// Something that can deliver an [`Email`] to the recipients of an [`Envelope`]
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `email` - The content of the message.
    /// * `envelope` - The sender and recipients.
    ///
    /// # Returns
    /// - [`Ok`] with a [`SendResult`] once the provider has answered, whether it accepted the
    ///   message or not.
    /// - [`Err`] with a [`MailerError`] if the request could not be built, never reached the
    ///   provider, or the provider's answer could not be interpreted.
    async fn send(&self, email: &Email, envelope: &Envelope) -> Result<SendResult, MailerError>;
}

#[cfg(test)]
mock! {
    pub Transport {}

    #[async_trait]
    impl Transport for Transport {
        async fn send(&self, email: &Email, envelope: &Envelope) -> Result<SendResult, MailerError>;
    }
}
