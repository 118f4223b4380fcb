//! # Order Item Model
//!
//! A single line item of an order. Items are reconciled against submitted
//! data on every save: unknown ids are created, matching ids updated in
//! place, missing ids removed (see `orchestration::items`).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub item_id: i64,
    pub order_id: i64,
    pub name: Option<String>,
    pub item_number: Option<String>,
    pub quantity: f64,
    pub price: f64,
    pub discount_percent: f64,
    pub tax_rate: f64,
    pub total_net_price: f64,
}

/// New OrderItem for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub order_id: i64,
    pub name: Option<String>,
    pub item_number: Option<String>,
    pub quantity: f64,
    pub price: f64,
    pub discount_percent: f64,
    pub tax_rate: f64,
}

impl OrderItem {
    /// Net price for the given quantity, price and discount.
    pub fn calculate_total_net_price(quantity: f64, price: f64, discount_percent: f64) -> f64 {
        quantity * price * (1.0 - discount_percent / 100.0)
    }
}

#[cfg(test)]
impl OrderItem {
    pub fn sample(item_id: i64, order_id: i64) -> Self {
        Self {
            item_id,
            order_id,
            name: Some(format!("item-{item_id}")),
            item_number: Some(format!("NO-{item_id:04}")),
            quantity: 1.0,
            price: 10.0,
            discount_percent: 0.0,
            tax_rate: 20.0,
            total_net_price: 10.0,
        }
    }
}
