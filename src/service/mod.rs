//! Order Service
//!
//! Cache-aside orchestration between callers, the cache and the durable
//! order store.
//!
//! - Reads consult the cache first and fall back to the store, caching the
//!   result (read-through).
//! - Writes go to the store first; the cache only sees an order after the
//!   store has accepted it (write-through).
//! - `restore_cache` warms the cache from the store's most recent orders and
//!   must finish before the service takes traffic.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{build_cache, Cache, CacheStats};
use crate::config::Config;
use crate::context::Context;
use crate::error::{Result, ServiceError, ValidationError};
use crate::models::{Order, OrderResponse};
use crate::repository::OrderRepository;

/// Single orchestrator over one cache instance and one order store.
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    cache: Arc<dyn Cache<Arc<Order>>>,
    restore_count: usize,
}

impl OrderService {
    pub fn new(
        repo: Arc<dyn OrderRepository>,
        cache: Arc<dyn Cache<Arc<Order>>>,
        restore_count: usize,
    ) -> Self {
        Self {
            repo,
            cache,
            restore_count,
        }
    }

    /// Builds the service with the cache strategy selected by `config`.
    ///
    /// Must be called from within a Tokio runtime when a TTL is configured.
    pub fn from_config(repo: Arc<dyn OrderRepository>, config: &Config) -> Self {
        let cache = build_cache(config.cache_policy());
        Self::new(repo, cache, config.startup_size)
    }

    // == Restore ==
    /// Loads the most recent orders from the store into the cache.
    ///
    /// Returns the number of orders loaded. Any store failure is an
    /// initialization failure: the service must not be exposed.
    pub async fn restore_cache(&self, ctx: &Context) -> Result<usize> {
        let orders = ctx
            .run(self.repo.get_last_orders(self.restore_count))
            .await
            .map_err(ServiceError::Initialization)?;

        let count = orders.len();
        // Oldest first, so the newest order ends up most recently used
        for order in orders.into_iter().rev() {
            self.cache.set(order.order_uid.clone(), Arc::new(order));
        }

        info!(
            restored = count,
            requested = self.restore_count,
            store = self.repo.name(),
            "Cache restored from store"
        );
        Ok(count)
    }

    // == Reads ==
    /// Returns the order for `uid`, from the cache when present.
    ///
    /// # Errors
    /// - `ServiceError::Validation` for an empty `uid`
    /// - `ServiceError::NotFound` when the store has no such order
    /// - `ServiceError::Store` for any other store failure, including an
    ///   expired or cancelled `ctx`
    ///
    /// A miss racing a `create_order` for the same uid may cache the older
    /// store value after the newer one; the last `set` wins.
    pub async fn get_order_by_uid(&self, ctx: &Context, uid: &str) -> Result<Arc<Order>> {
        if uid.is_empty() {
            return Err(ValidationError::new("order", "order_uid is required").into());
        }

        if let Some(order) = self.cache.get(uid) {
            debug!(uid, "cache hit");
            return Ok(order);
        }

        let order = Arc::new(ctx.run(self.repo.get_order(uid)).await?);
        self.cache.set(uid.to_string(), Arc::clone(&order));
        debug!(uid, "cache miss, loaded from store");

        Ok(order)
    }

    /// Same as [`get_order_by_uid`](Self::get_order_by_uid), projected for
    /// external callers.
    pub async fn get_order_response(&self, ctx: &Context, uid: &str) -> Result<OrderResponse> {
        let order = self.get_order_by_uid(ctx, uid).await?;
        Ok(OrderResponse::from(order.as_ref()))
    }

    // == Writes ==
    /// Validates and persists `order`, then caches it.
    ///
    /// An invalid order never reaches the store or the cache. A store
    /// failure leaves the cache untouched.
    pub async fn create_order(&self, ctx: &Context, order: Order) -> Result<Arc<Order>> {
        order.validate()?;

        ctx.run(self.repo.create_order(&order)).await?;

        let order = Arc::new(order);
        self.cache.set(order.order_uid.clone(), Arc::clone(&order));

        Ok(order)
    }

    /// Entry point for the ingestion path.
    pub async fn save_order(&self, ctx: &Context, order: Order) -> Result<()> {
        let order = self.create_order(ctx, order).await?;
        info!(uid = %order.order_uid, "Order saved");
        Ok(())
    }

    // == Lifecycle ==
    /// Releases the cache. Safe to call more than once.
    pub fn close(&self) {
        if self.cache.is_closed() {
            return;
        }
        self.cache.close();
        info!("Order cache closed");
    }

    pub fn is_closed(&self) -> bool {
        self.cache.is_closed()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cached_orders(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LruCache;
    use crate::error::StoreError;
    use crate::models::sample_order;
    use crate::repository::MemoryRepository;
    use chrono::Duration as ChronoDuration;

    fn service_with(repo: MemoryRepository, capacity: usize, restore: usize) -> OrderService {
        OrderService::new(Arc::new(repo), Arc::new(LruCache::new(capacity)), restore)
    }

    #[tokio::test]
    async fn test_restore_loads_most_recent() {
        let base = sample_order("base").date_created;
        let orders = (0..5).map(|i| {
            let mut order = sample_order(&format!("r-{}", i));
            order.date_created = base + ChronoDuration::minutes(i);
            order
        });
        let service = service_with(MemoryRepository::with_orders(orders), 10, 3);

        let restored = service.restore_cache(&Context::background()).await.unwrap();

        assert_eq!(restored, 3);
        assert_eq!(service.cached_orders(), 3);
    }

    #[tokio::test]
    async fn test_restore_failure_is_initialization_error() {
        let service = service_with(MemoryRepository::new(), 10, 3);
        let (ctx, handle) = Context::with_cancel();
        handle.cancel();

        let result = service.restore_cache(&ctx).await;
        assert!(matches!(
            result,
            Err(ServiceError::Initialization(StoreError::Cancelled))
        ));
    }

    #[tokio::test]
    async fn test_get_caches_store_result() {
        let repo = MemoryRepository::with_orders([sample_order("g-1")]);
        let service = service_with(repo, 10, 0);
        let ctx = Context::background();

        let first = service.get_order_by_uid(&ctx, "g-1").await.unwrap();
        let second = service.get_order_by_uid(&ctx, "g-1").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let stats = service.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_get_empty_uid() {
        let service = service_with(MemoryRepository::new(), 10, 0);
        let result = service.get_order_by_uid(&Context::background(), "").await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(service.cache_stats(), CacheStats::default());
    }

    #[tokio::test]
    async fn test_get_missing_order() {
        let service = service_with(MemoryRepository::new(), 10, 0);
        let result = service.get_order_by_uid(&Context::background(), "nope").await;

        assert!(matches!(result, Err(ServiceError::NotFound(uid)) if uid == "nope"));
    }

    #[tokio::test]
    async fn test_create_then_get_hits_cache() {
        let service = service_with(MemoryRepository::new(), 10, 0);
        let ctx = Context::background();

        let created = service
            .create_order(&ctx, sample_order("c-1"))
            .await
            .unwrap();
        let fetched = service.get_order_by_uid(&ctx, "c-1").await.unwrap();

        assert!(Arc::ptr_eq(&created, &fetched));
        assert_eq!(service.cache_stats().misses, 0);
    }

    #[tokio::test]
    async fn test_create_invalid_order() {
        let service = service_with(MemoryRepository::new(), 10, 0);
        let mut order = sample_order("bad");
        order.payment.amount = 0;

        let result = service.create_order(&Context::background(), order).await;

        match result {
            Err(ServiceError::Validation(err)) => assert_eq!(err.group, "payment"),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(service.cache_stats(), CacheStats::default());
    }

    #[tokio::test]
    async fn test_get_order_response_projects() {
        let repo = MemoryRepository::with_orders([sample_order("p-1")]);
        let service = service_with(repo, 10, 0);

        let response = service
            .get_order_response(&Context::background(), "p-1")
            .await
            .unwrap();

        assert_eq!(response.order_uid, "p-1");
        assert_eq!(response.items.len(), 1);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let service = service_with(MemoryRepository::new(), 10, 0);
        let ctx = Context::background();
        service
            .create_order(&ctx, sample_order("x"))
            .await
            .unwrap();

        service.close();
        service.close();

        assert!(service.is_closed());
        assert_eq!(service.cached_orders(), 0);
    }
}
