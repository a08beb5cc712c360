//! Domain types for sending email

pub mod communication;
