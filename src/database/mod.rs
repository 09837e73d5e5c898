//! Typed repositories over the storefront's structured record store.
//!
//! The remote store is an external dependency; this module fixes the record
//! schemas and the repository contract, and provides an in-memory store.

pub mod error;
pub mod order_repository;
pub mod repository;

pub use error::{DatabaseError, DatabaseErrorKind};
pub use order_repository::{InMemoryOrderRepository, OrderRecord, OrderRepository, OrderStatus};
pub use repository::Repository;
