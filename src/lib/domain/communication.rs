//! Email communication

pub mod email;
pub mod email_addresses;
pub mod envelope;
pub mod transport;
