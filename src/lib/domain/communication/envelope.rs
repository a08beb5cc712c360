//! Message envelope

use thiserror::Error;

use super::email_addresses::Address;

/// An error that can occur when building an [`Envelope`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// An envelope needs at least one `to` recipient
    #[error("an envelope needs at least one recipient")]
    NoRecipients,
}

/// Who a message is from and who it goes to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    sender: Address,
    to: Vec<Address>,
    cc: Vec<Address>,
    bcc: Vec<Address>,
    reply_to: Vec<Address>,
}

impl Envelope {
    /// Create an envelope. Fails if `to` is empty.
    pub fn new(sender: Address, to: Vec<Address>) -> Result<Self, EnvelopeError> {
        if to.is_empty() {
            return Err(EnvelopeError::NoRecipients);
        }

        Ok(Self {
            sender,
            to,
            cc: Vec::new(),
            bcc: Vec::new(),
            reply_to: Vec::new(),
        })
    }

    /// Set the carbon copy recipients
    pub fn cc(mut self, cc: Vec<Address>) -> Self {
        self.cc = cc;
        self
    }

    /// Set the blind carbon copy recipients
    pub fn bcc(mut self, bcc: Vec<Address>) -> Self {
        self.bcc = bcc;
        self
    }

    /// Set the reply-to addresses
    pub fn reply_to(mut self, reply_to: Vec<Address>) -> Self {
        self.reply_to = reply_to;
        self
    }

    /// The sender
    pub fn sender(&self) -> &Address {
        &self.sender
    }

    /// The primary recipients, never empty
    pub fn to_recipients(&self) -> &[Address] {
        &self.to
    }

    /// The carbon copy recipients
    pub fn cc_recipients(&self) -> &[Address] {
        &self.cc
    }

    /// The blind carbon copy recipients
    pub fn bcc_recipients(&self) -> &[Address] {
        &self.bcc
    }

    /// The reply-to addresses
    pub fn reply_to_addresses(&self) -> &[Address] {
        &self.reply_to
    }

    /// Total number of recipients across `to`, `cc` and `bcc`
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}
