//! # Order Activity Log Model
//!
//! Immutable audit trail of status changes. Every effective status
//! transition appends one row capturing the previous status (if any), the
//! new status and a creation timestamp. Rows are never updated or deleted.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderActivityLog {
    pub id: i64,
    pub order_id: i64,
    pub status_from: Option<i32>,
    pub status_to: i32,
    pub created_at: NaiveDateTime,
}

/// New OrderActivityLog for creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderActivityLog {
    pub order_id: i64,
    pub status_from: Option<i32>,
    pub status_to: i32,
    pub created_at: NaiveDateTime,
}
