//! Storefront payment service: brokers PayPal order creation for checkout and
//! completes orders when the buyer returns from PayPal.

pub mod api;
pub mod checkout;
pub mod config;
pub mod database;
pub mod logging;
pub mod payments;
pub mod secrets;
