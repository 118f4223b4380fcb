//! # Order Status Model
//!
//! Reference entity for order statuses. The `name` is a translation key
//! resolved by the listing layer through a locale-filtered translation row.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OrderStatus {
    pub status_id: i32,
    pub name: String,
}
