//! Repository traits over the order domain's storage.
//!
//! Read-side lookups and the write-side flush target are separate seams so
//! the workflows stay testable against in-memory fakes while the postgres
//! implementations back production use.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Account, Contact, NewOrderActivityLog, Order, OrderStatus, TermsOfDelivery, TermsOfPayment,
    User,
};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order aggregate by id and locale.
    async fn find_by_id(&self, order_id: i64, locale: &str) -> Result<Option<Order>>;

    /// Resolve the order owning the given line item.
    async fn find_by_item_id(&self, item_id: i64) -> Result<Option<Order>>;
}

#[async_trait]
pub trait StatusRepository: Send + Sync {
    async fn find_by_id(&self, status_id: i32) -> Result<Option<OrderStatus>>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, account_id: i32) -> Result<Option<Account>>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn find_by_id(&self, contact_id: i32) -> Result<Option<Contact>>;
}

#[async_trait]
pub trait TermsOfDeliveryRepository: Send + Sync {
    async fn find_by_id(&self, terms_id: i32) -> Result<Option<TermsOfDelivery>>;
}

#[async_trait]
pub trait TermsOfPaymentRepository: Send + Sync {
    async fn find_by_id(&self, terms_id: i32) -> Result<Option<TermsOfPayment>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>>;
}

/// The lookup collaborators of the save workflow, bundled so they travel
/// together.
#[derive(Clone)]
pub struct OrderRepositories {
    pub orders: Arc<dyn OrderRepository>,
    pub statuses: Arc<dyn StatusRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub terms_of_delivery: Arc<dyn TermsOfDeliveryRepository>,
    pub terms_of_payment: Arc<dyn TermsOfPaymentRepository>,
    pub users: Arc<dyn UserRepository>,
}

/// Write-side flush target for the unit of work.
///
/// `next_order_id` hands out aggregate ids ahead of the insert (sequence
/// allocation), so a not-yet-flushed aggregate already carries its final id.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn next_order_id(&self) -> Result<i64>;

    /// Insert or update the full aggregate: order row, both addresses and
    /// all current items.
    async fn upsert_order(&self, order: &Order) -> Result<()>;

    async fn remove_item(&self, item_id: i64) -> Result<()>;

    async fn insert_activity_log(&self, log: &NewOrderActivityLog) -> Result<()>;
}
