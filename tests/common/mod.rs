//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use order_cache::cache::LruCache;
use order_cache::models::{Delivery, Item, Order, Payment};
use order_cache::{MemoryRepository, OrderRepository, OrderService, StoreError};

/// Builds a fully valid order.
pub fn order(uid: &str) -> Order {
    Order {
        order_uid: uid.to_string(),
        track_number: "WBILMTESTTRACK".to_string(),
        entry: "WBIL".to_string(),
        delivery: Delivery {
            name: "Test Testov".to_string(),
            phone: "+9720000000".to_string(),
            zip: "2639809".to_string(),
            city: "Kiryat Mozkin".to_string(),
            address: "Ploshad Mira 15".to_string(),
            region: "Kraiot".to_string(),
            email: "test@gmail.com".to_string(),
        },
        payment: Payment {
            transaction: uid.to_string(),
            request_id: String::new(),
            currency: "USD".to_string(),
            provider: "wbpay".to_string(),
            amount: 1817,
            payment_dt: 1_637_907_727,
            bank: "alpha".to_string(),
            delivery_cost: 1500,
            goods_total: 317,
            custom_fee: 0,
        },
        items: vec![Item {
            chrt_id: 9_934_930,
            track_number: "WBILMTESTTRACK".to_string(),
            price: 453,
            rid: "ab4219087a764ae0btest".to_string(),
            name: "Mascaras".to_string(),
            sale: 30,
            size: "0".to_string(),
            total_price: 317,
            nm_id: 2_389_212,
            brand: "Vivienne Sabo".to_string(),
            status: 202,
        }],
        locale: "en".to_string(),
        internal_signature: String::new(),
        customer_id: "test".to_string(),
        delivery_service: "meest".to_string(),
        shardkey: "9".to_string(),
        sm_id: 99,
        date_created: Utc.with_ymd_and_hms(2021, 11, 26, 6, 22, 19).unwrap(),
        oof_shard: "1".to_string(),
    }
}

/// Wraps a `MemoryRepository`, counting calls and optionally failing or
/// stalling them.
#[derive(Default)]
pub struct CountingRepository {
    inner: MemoryRepository,
    pub creates: AtomicUsize,
    pub gets: AtomicUsize,
    pub last_orders: AtomicUsize,
    pub fail: AtomicBool,
    pub delay: Option<Duration>,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            inner: MemoryRepository::with_orders(orders),
            ..Self::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let repo = Self::default();
        repo.fail.store(true, Ordering::SeqCst);
        repo
    }

    pub fn calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
            + self.gets.load(Ordering::SeqCst)
            + self.last_orders.load(Ordering::SeqCst)
    }

    async fn before_call(&self) -> Result<(), StoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for CountingRepository {
    async fn create_order(&self, order: &Order) -> Result<(), StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        self.inner.create_order(order).await
    }

    async fn get_order(&self, uid: &str) -> Result<Order, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        self.inner.get_order(uid).await
    }

    async fn get_last_orders(&self, limit: usize) -> Result<Vec<Order>, StoreError> {
        self.last_orders.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        self.inner.get_last_orders(limit).await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Service over `repo` with a plain LRU cache.
pub fn service(repo: Arc<CountingRepository>, capacity: usize, restore: usize) -> OrderService {
    OrderService::new(repo, Arc::new(LruCache::new(capacity)), restore)
}
