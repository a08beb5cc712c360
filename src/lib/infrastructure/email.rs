//! Email transports

pub mod azure;
pub mod dsn;
pub mod registry;
