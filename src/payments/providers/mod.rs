//! Payment provider implementations

pub mod paypal;

pub use paypal::{PaypalConfig, PaypalProvider};
