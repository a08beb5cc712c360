//! Email addresses module.

mod address;
mod email_address;

pub use address::{Address, AddressError};
pub use email_address::{EmailAddress, EmailAddressError};
