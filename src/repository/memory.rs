//! In-process order store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{newest_first, OrderRepository};
use crate::error::StoreError;
use crate::models::Order;

/// Keeps orders in a map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    orders: RwLock<HashMap<String, Order>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-filled with `orders`.
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let orders = orders
            .into_iter()
            .map(|order| (order.order_uid.clone(), order))
            .collect();
        Self {
            orders: RwLock::new(orders),
        }
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderRepository for MemoryRepository {
    async fn create_order(&self, order: &Order) -> Result<(), StoreError> {
        if order.order_uid.is_empty() {
            return Err(StoreError::Backend("order_uid cannot be empty".to_string()));
        }
        self.orders
            .write()
            .await
            .insert(order.order_uid.clone(), order.clone());
        Ok(())
    }

    async fn get_order(&self, uid: &str) -> Result<Order, StoreError> {
        self.orders
            .read()
            .await
            .get(uid)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(uid.to_string()))
    }

    async fn get_last_orders(&self, limit: usize) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().await.values().cloned().collect();
        Ok(newest_first(orders, limit))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
