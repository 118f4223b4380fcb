//! # Order Model
//!
//! Aggregate root of the order domain: the order row itself plus its two
//! owned address snapshots and its line-item collection, treated as one
//! consistency boundary.
//!
//! ## Overview
//!
//! An order references read-only entities (account, contact, terms of
//! delivery/payment, status) by id and denormalizes a few of their values
//! onto itself: the customer display name and the terms content strings.
//! Status history is kept twice - as an immutable activity log and as a
//! bitmask whose set bits record every status ever applied.
//!
//! ## Database Schema
//!
//! Maps to the `orders` table plus `order_addresses` (1:2) and
//! `order_items` (1:n):
//! - `order_id`: Primary key (BIGINT)
//! - `status_id`: References `order_statuses` (INTEGER)
//! - `bitmask_status`: Accumulated status flags (BIGINT)
//! - `invoice_address_id` / `delivery_address_id`: owned snapshots

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::order_address::OrderAddress;
use super::order_item::OrderItem;
use crate::constants::status_flag;

/// An order aggregate: root row, both address snapshots and line items.
///
/// [`Order::create`] leaves `order_id` at 0; the save workflow assigns the
/// real id from the store's sequence before registering the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub order_number: Option<String>,
    pub currency: Option<String>,
    pub cost_centre: Option<String>,
    pub commission: Option<String>,
    pub tax_free: bool,
    pub customer_name: Option<String>,
    pub desired_delivery_date: Option<NaiveDateTime>,
    pub order_date: Option<NaiveDateTime>,
    pub status_id: Option<i32>,
    pub bitmask_status: i64,
    pub account_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub responsible_contact_id: Option<i32>,
    pub terms_of_delivery_id: Option<i32>,
    pub terms_of_delivery_content: Option<String>,
    pub terms_of_payment_id: Option<i32>,
    pub terms_of_payment_content: Option<String>,
    pub total_net_price: f64,
    pub invoice_address: OrderAddress,
    pub delivery_address: OrderAddress,
    pub items: Vec<OrderItem>,
    pub locale: String,
    pub creator_id: Option<i64>,
    pub changer_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub changed_at: NaiveDateTime,
}

/// New Order for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub locale: String,
    pub creator_id: Option<i64>,
}

impl Order {
    /// Create a fresh aggregate with two empty address sub-entities.
    pub fn create(new_order: NewOrder, now: NaiveDateTime) -> Self {
        Self {
            order_id: 0,
            order_number: None,
            currency: None,
            cost_centre: None,
            commission: None,
            tax_free: false,
            customer_name: None,
            desired_delivery_date: None,
            order_date: None,
            status_id: None,
            bitmask_status: 0,
            account_id: None,
            contact_id: None,
            responsible_contact_id: None,
            terms_of_delivery_id: None,
            terms_of_delivery_content: None,
            terms_of_payment_id: None,
            terms_of_payment_content: None,
            total_net_price: 0.0,
            invoice_address: OrderAddress::empty(),
            delivery_address: OrderAddress::empty(),
            items: Vec::new(),
            locale: new_order.locale,
            creator_id: new_order.creator_id,
            changer_id: new_order.creator_id,
            created_at: now,
            changed_at: now,
        }
    }

    /// Whether the flag for `status_id` is present in the bitmask history.
    pub fn has_status_flag(&self, status_id: i32) -> bool {
        self.bitmask_status & status_flag(status_id) != 0
    }

    pub fn set_status_flag(&mut self, status_id: i32) {
        self.bitmask_status |= status_flag(status_id);
    }

    pub fn clear_status_flag(&mut self, status_id: i32) {
        self.bitmask_status &= !status_flag(status_id);
    }

    /// Recompute the order total from its items.
    pub fn recalculate_total_net_price(&mut self) {
        self.total_net_price = self.items.iter().map(|item| item.total_net_price).sum();
    }

    pub fn find_item(&self, item_id: i64) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    pub fn find_item_mut(&mut self, item_id: i64) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|item| item.item_id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order_item::OrderItem;

    fn order() -> Order {
        Order::create(
            NewOrder {
                locale: "en".to_string(),
                creator_id: Some(1),
            },
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_new_order_has_empty_addresses() {
        let order = order();
        assert_eq!(order.order_id, 0);
        assert_eq!(order.invoice_address, OrderAddress::empty());
        assert_eq!(order.delivery_address, OrderAddress::empty());
        assert_eq!(order.bitmask_status, 0);
    }

    #[test]
    fn test_status_flags() {
        let mut order = order();
        order.set_status_flag(1);
        order.set_status_flag(3);
        assert!(order.has_status_flag(1));
        assert!(!order.has_status_flag(2));
        order.clear_status_flag(1);
        assert!(!order.has_status_flag(1));
        assert!(order.has_status_flag(3));
    }

    #[test]
    fn test_total_net_price_sums_items() {
        let mut order = order();
        order.items.push(OrderItem {
            total_net_price: 12.5,
            ..OrderItem::sample(1, order.order_id)
        });
        order.items.push(OrderItem {
            total_net_price: 7.5,
            ..OrderItem::sample(2, order.order_id)
        });
        order.recalculate_total_net_price();
        assert_eq!(order.total_net_price, 20.0);
    }
}
