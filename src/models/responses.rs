//! Response DTOs for the order API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::{Delivery, Item, Order, Payment};

/// Public projection of an order.
///
/// Omits internal fields: entry, signature, customer and shard data, the
/// payment transaction ids and per-item identifiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderResponse {
    pub order_uid: String,
    pub track_number: String,
    pub delivery: Delivery,
    pub payment: PaymentResponse,
    pub items: Vec<ItemResponse>,
    pub locale: String,
    pub delivery_service: String,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentResponse {
    pub currency: String,
    pub provider: String,
    pub amount: i64,
    pub payment_dt: i64,
    pub bank: String,
    pub delivery_cost: i64,
    pub goods_total: i64,
    pub custom_fee: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemResponse {
    pub track_number: String,
    pub price: i64,
    pub name: String,
    pub sale: i64,
    pub size: String,
    pub total_price: i64,
    pub brand: String,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            currency: payment.currency.clone(),
            provider: payment.provider.clone(),
            amount: payment.amount,
            payment_dt: payment.payment_dt,
            bank: payment.bank.clone(),
            delivery_cost: payment.delivery_cost,
            goods_total: payment.goods_total,
            custom_fee: payment.custom_fee,
        }
    }
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            track_number: item.track_number.clone(),
            price: item.price,
            name: item.name.clone(),
            sale: item.sale,
            size: item.size.clone(),
            total_price: item.total_price,
            brand: item.brand.clone(),
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            order_uid: order.order_uid.clone(),
            track_number: order.track_number.clone(),
            delivery: order.delivery.clone(),
            payment: PaymentResponse::from(&order.payment),
            items: order.items.iter().map(ItemResponse::from).collect(),
            locale: order.locale.clone(),
            delivery_service: order.delivery_service.clone(),
            date_created: order.date_created,
        }
    }
}

/// Response body for POST /order
#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub order_uid: String,
}

impl CreatedResponse {
    pub fn new(order_uid: impl Into<String>) -> Self {
        let order_uid = order_uid.into();
        Self {
            message: format!("Order '{}' stored successfully", order_uid),
            order_uid,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
