//! Server-side hand-off between PayPal approval and order placement.

pub mod pending;
pub mod service;

pub use pending::{InMemoryPendingOrderStore, PendingOrder, PendingOrderStore};
pub use service::{CheckoutError, CheckoutService};
