//! Durable order storage
//!
//! The service talks to storage only through [`OrderRepository`], so the
//! backing store can be swapped without touching the cache-aside logic.
//!
//! # Implementors
//! - `JsonFileRepository` - append-only JSON-lines file
//! - `MemoryRepository` - in-process map, for tests and ephemeral runs

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::Order;

pub use file::JsonFileRepository;
pub use memory::MemoryRepository;

/// A durable store of orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists the whole order atomically.
    ///
    /// Either the header, delivery, payment and every item are stored, or
    /// nothing is. Storing an existing identifier replaces it.
    async fn create_order(&self, order: &Order) -> Result<(), StoreError>;

    /// Loads one order.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when no order has this identifier
    async fn get_order(&self, uid: &str) -> Result<Order, StoreError>;

    /// Loads up to `limit` orders, newest `date_created` first.
    async fn get_last_orders(&self, limit: usize) -> Result<Vec<Order>, StoreError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Sorts newest first and keeps at most `limit` orders.
pub(crate) fn newest_first(mut orders: Vec<Order>, limit: usize) -> Vec<Order> {
    orders.sort_by(|a, b| {
        b.date_created
            .cmp(&a.date_created)
            .then_with(|| a.order_uid.cmp(&b.order_uid))
    });
    orders.truncate(limit);
    orders
}
