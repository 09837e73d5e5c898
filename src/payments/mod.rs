//! PayPal checkout gateway
//!
//! Validates storefront checkout requests, obtains a PayPal access token and
//! creates the PayPal order whose approval URL the buyer is redirected to.

pub mod error;
pub mod gateway;
pub mod money;
pub mod payload;
pub mod providers;
pub mod traits;
pub mod types;
pub mod validation;

pub use error::{PaymentError, PaymentResult};
pub use gateway::PaymentGateway;
pub use traits::PaymentProvider;
