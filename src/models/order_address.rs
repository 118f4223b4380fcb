//! # Order Address Model
//!
//! A point-in-time copy of contact/account address fields attached to an
//! order for invoice and delivery purposes. Created empty at order creation
//! and fully repopulated on every save - a snapshot, never a live reference.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderAddress {
    pub address_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub account_name: Option<String>,
    pub title: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub addition: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postbox_number: Option<String>,
    pub postbox_postcode: Option<String>,
    pub postbox_city: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_mobile: Option<String>,
}

impl OrderAddress {
    pub fn empty() -> Self {
        Self::default()
    }
}
