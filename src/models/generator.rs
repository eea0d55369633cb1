//! Synthetic order generation
//!
//! Produces complete, valid orders for feeding the ingestion path by hand.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::models::{Delivery, Item, Order, Payment};

const NAMES: &[&str] = &["Ivan Petrov", "Anna Smirnova", "John Carter", "Maria Lopez"];
const CITIES: &[&str] = &["Moscow", "Kazan", "Berlin", "Haifa", "Austin"];
const STREETS: &[&str] = &["Lenina", "Mira", "Main", "Oak", "Harbor"];
const PROVIDERS: &[&str] = &["stripe", "paypal", "bank_transfer"];
const BANKS: &[&str] = &["Sber", "Tinkoff", "Alpha", "VTB"];
const DELIVERY_SERVICES: &[&str] = &["DHL", "FedEx", "UPS", "SDEK", "Russian Post"];
const BRANDS: &[&str] = &["Vivienne Sabo", "Nike", "Xiaomi", "Lego"];

fn pick<R: Rng>(rng: &mut R, values: &[&str]) -> String {
    values.choose(rng).copied().unwrap_or_default().to_string()
}

/// Generates an order with a fresh random identifier.
pub fn generate_order() -> Order {
    generate_order_with(&mut rand::thread_rng())
}

/// Generates an order drawing every field from `rng`.
///
/// Payment totals are consistent with the items: `goods_total` is the sum
/// of item totals, `custom_fee` 5% of it, and `amount` the grand total.
pub fn generate_order_with<R: Rng>(rng: &mut R) -> Order {
    let track_number = format!("WBIL{}", rng.gen_range(10_000_000..=99_999_999));
    let item_count = rng.gen_range(1..=5);
    let items: Vec<Item> = (0..item_count)
        .map(|_| generate_item(rng, &track_number))
        .collect();

    let goods_total: i64 = items.iter().map(|item| item.total_price).sum();
    let delivery_cost = rng.gen_range(300..=2000);
    let custom_fee = (goods_total as f64 * 0.05).round() as i64;
    let now = Utc::now();

    Order {
        order_uid: Uuid::from_u128(rng.gen()).simple().to_string(),
        track_number: track_number.clone(),
        entry: "WBIL".to_string(),
        delivery: Delivery {
            name: pick(rng, NAMES),
            phone: format!("+7{}", rng.gen_range(9_000_000_000u64..=9_999_999_999)),
            zip: rng.gen_range(100_000..=999_999).to_string(),
            city: pick(rng, CITIES),
            address: format!("{} St, {}", pick(rng, STREETS), rng.gen_range(1..=200)),
            region: pick(rng, CITIES),
            email: format!("customer{}@example.com", rng.gen_range(1..=99_999)),
        },
        payment: Payment {
            transaction: Uuid::from_u128(rng.gen()).to_string(),
            request_id: String::new(),
            currency: "USD".to_string(),
            provider: pick(rng, PROVIDERS),
            amount: goods_total + delivery_cost + custom_fee,
            payment_dt: now.timestamp(),
            bank: pick(rng, BANKS),
            delivery_cost,
            goods_total,
            custom_fee,
        },
        items,
        locale: pick(rng, &["en", "ru"]),
        internal_signature: String::new(),
        customer_id: format!("customer_{}", rng.gen_range(1..=99_999)),
        delivery_service: pick(rng, DELIVERY_SERVICES),
        shardkey: rng.gen_range(1..=10).to_string(),
        sm_id: rng.gen_range(1..=999),
        date_created: now,
        oof_shard: rng.gen_range(1..=10).to_string(),
    }
}

fn generate_item<R: Rng>(rng: &mut R, track_number: &str) -> Item {
    let price: i64 = rng.gen_range(100..=10_000);
    let sale: i64 = rng.gen_range(0..=50);

    Item {
        chrt_id: rng.gen_range(1_000_000..=9_999_999),
        track_number: track_number.to_string(),
        price,
        rid: Uuid::from_u128(rng.gen()).simple().to_string(),
        name: format!("Item {}", rng.gen_range(1..=1000)),
        sale,
        size: rng.gen_range(0..=5).to_string(),
        total_price: (price * (100 - sale) / 100).max(1),
        nm_id: rng.gen_range(1_000_000..=9_999_999),
        brand: pick(rng, BRANDS),
        status: 202,
    }
}
