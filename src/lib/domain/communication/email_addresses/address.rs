//! Mailbox address with an optional display name

use std::{fmt, str::FromStr};

use lettre::message::Mailbox;
use thiserror::Error;

use super::{EmailAddress, EmailAddressError};

/// An error that can occur when parsing an [`Address`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The input is not a mailbox such as `Jane Doe <jane@example.com>`
    #[error("could not parse mailbox \"{0}\"")]
    Unparseable(String),

    /// The mailbox parsed but its address did not validate
    #[error(transparent)]
    InvalidEmailAddress(#[from] EmailAddressError),
}

/// A recipient or sender: an email address and an optional display name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    email: EmailAddress,
    name: Option<String>,
}

impl Address {
    /// Create an address without a display name
    pub fn new(email: EmailAddress) -> Self {
        Self { email, name: None }
    }

    /// Create an address with a display name. A blank name is dropped.
    pub fn with_name(email: EmailAddress, name: &str) -> Self {
        let name = name.trim();

        Self {
            email,
            name: (!name.is_empty()).then(|| name.to_string()),
        }
    }

    /// The email address
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The display name, if one was given
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mailbox = Mailbox::from_str(raw.trim())
            .map_err(|_| AddressError::Unparseable(raw.to_string()))?;

        let email = EmailAddress::new(&mailbox.email.to_string())?;

        Ok(match mailbox.name {
            Some(name) => Self::with_name(email, &name),
            None => Self::new(email),
        })
    }
}

impl From<EmailAddress> for Address {
    fn from(email: EmailAddress) -> Self {
        Self::new(email)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => write!(f, "{}", self.email),
        }
    }
}
