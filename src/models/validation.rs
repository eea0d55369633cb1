//! Structural validation of incoming orders.
//!
//! Checks run in a fixed order and stop at the first failure, which is
//! reported together with its field group.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;
use crate::models::{Delivery, Item, Order, Payment};

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern is valid"));

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

fn require(group: &'static str, value: &str, field: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(group, format!("{} is required", field)));
    }
    Ok(())
}

fn require_positive(group: &'static str, value: i64, field: &str) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(group, format!("{} must be positive", field)));
    }
    Ok(())
}

impl Order {
    /// Validates the whole order: header, delivery, payment, then items.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("order", &self.order_uid, "order_uid")?;
        require("order", &self.track_number, "track_number")?;
        require("order", &self.entry, "entry")?;

        self.delivery.validate()?;
        self.payment.validate()?;

        if self.items.is_empty() {
            return Err(ValidationError::new(
                "items",
                "order must contain at least one item",
            ));
        }
        for (index, item) in self.items.iter().enumerate() {
            item.validate().map_err(|reason| {
                ValidationError::new("items", format!("item {}: {}", index + 1, reason))
            })?;
        }

        Ok(())
    }
}

impl Delivery {
    pub fn validate(&self) -> Result<(), ValidationError> {
        const GROUP: &str = "delivery";

        require(GROUP, &self.name, "name")?;
        if !PHONE_PATTERN.is_match(&self.phone) {
            return Err(ValidationError::new(GROUP, "invalid phone format"));
        }
        require(GROUP, &self.zip, "zip")?;
        require(GROUP, &self.city, "city")?;
        require(GROUP, &self.address, "address")?;
        if !self.email.is_empty() && !EMAIL_PATTERN.is_match(&self.email) {
            return Err(ValidationError::new(GROUP, "invalid email format"));
        }
        Ok(())
    }
}

impl Payment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        const GROUP: &str = "payment";

        require(GROUP, &self.transaction, "transaction")?;
        require(GROUP, &self.currency, "currency")?;
        require(GROUP, &self.provider, "provider")?;
        require_positive(GROUP, self.amount, "amount")
    }
}

impl Item {
    /// Validates one line item. The returned reason carries no position;
    /// `Order::validate` adds it.
    pub fn validate(&self) -> Result<(), String> {
        if self.track_number.is_empty() {
            return Err("track_number is required".to_string());
        }
        if self.name.is_empty() {
            return Err("name is required".to_string());
        }
        if self.price <= 0 {
            return Err("price must be positive".to_string());
        }
        if self.total_price <= 0 {
            return Err("total_price must be positive".to_string());
        }
        Ok(())
    }
}
