//! Domain and transfer models
//!
//! The order aggregate, its validation rules, and the DTOs rendered by the
//! HTTP surface.

pub mod generator;
pub mod order;
pub mod responses;
mod validation;

pub use generator::{generate_order, generate_order_with};
pub use order::{Delivery, Item, Order, Payment};
pub use responses::{
    CreatedResponse, ErrorResponse, HealthResponse, ItemResponse, OrderResponse,
    PaymentResponse, StatsResponse,
};

/// Builds a fully valid order for unit tests.
#[cfg(test)]
pub(crate) fn sample_order(uid: &str) -> Order {
    use chrono::{TimeZone, Utc};

    Order {
        order_uid: uid.to_string(),
        track_number: "WBIL123456789".to_string(),
        entry: "WBIL".to_string(),
        delivery: Delivery {
            name: "Test User".to_string(),
            phone: "+79991234567".to_string(),
            zip: "123456".to_string(),
            city: "Moscow".to_string(),
            address: "Test St, 1".to_string(),
            region: "Moscow".to_string(),
            email: "test@example.com".to_string(),
        },
        payment: Payment {
            transaction: format!("tx-{}", uid),
            request_id: String::new(),
            currency: "USD".to_string(),
            provider: "stripe".to_string(),
            amount: 1000,
            payment_dt: 1_637_907_727,
            bank: "alpha".to_string(),
            delivery_cost: 500,
            goods_total: 500,
            custom_fee: 0,
        },
        items: vec![Item {
            chrt_id: 1,
            track_number: "WBIL123456789".to_string(),
            price: 500,
            rid: format!("rid-{}", uid),
            name: "Test Item".to_string(),
            sale: 0,
            size: "0".to_string(),
            total_price: 500,
            nm_id: 42,
            brand: "Brand".to_string(),
            status: 202,
        }],
        locale: "en".to_string(),
        internal_signature: "sig".to_string(),
        customer_id: "customer".to_string(),
        delivery_service: "meest".to_string(),
        shardkey: "9".to_string(),
        sm_id: 99,
        date_created: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        oof_shard: "1".to_string(),
    }
}
