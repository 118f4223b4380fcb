//! # Unit of Work
//!
//! Explicit, caller-owned replacement for a lazy ORM persistence context.
//! Workflows register changes as they go; nothing touches storage until the
//! caller (or a save invoked with `flush = true`) drains the queue into an
//! [`OrderStore`](super::repositories::OrderStore).
//!
//! A failure between registration and flush leaves the queue untouched, so
//! the in-memory state can be ahead of storage - callers discard the unit of
//! work or flush it, there is no partial rollback.

use crate::error::Result;
use crate::models::{NewOrderActivityLog, Order};

use super::repositories::OrderStore;

/// A single pending write, applied in registration order at flush.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingChange {
    UpsertOrder(Order),
    RemoveItem(i64),
    InsertActivityLog(NewOrderActivityLog),
}

#[derive(Debug, Default)]
pub struct UnitOfWork {
    pending: Vec<PendingChange>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the aggregate for persistence. Re-registering the same
    /// order id replaces the earlier snapshot in place, keeping its
    /// position in the queue.
    pub fn register_order(&mut self, order: &Order) {
        let existing = self.pending.iter_mut().find(
            |change| matches!(change, PendingChange::UpsertOrder(o) if o.order_id == order.order_id),
        );
        match existing {
            Some(slot) => *slot = PendingChange::UpsertOrder(order.clone()),
            None => self.pending.push(PendingChange::UpsertOrder(order.clone())),
        }
    }

    pub fn register_item_removal(&mut self, item_id: i64) {
        self.pending.push(PendingChange::RemoveItem(item_id));
    }

    pub fn register_activity_log(&mut self, log: NewOrderActivityLog) {
        self.pending.push(PendingChange::InsertActivityLog(log));
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> &[PendingChange] {
        &self.pending
    }

    /// Apply every pending change in registration order, then clear the
    /// queue. On error the queue is left intact for the caller to discard
    /// or retry.
    pub async fn flush(&mut self, store: &dyn OrderStore) -> Result<()> {
        for change in &self.pending {
            match change {
                PendingChange::UpsertOrder(order) => store.upsert_order(order).await?,
                PendingChange::RemoveItem(item_id) => store.remove_item(*item_id).await?,
                PendingChange::InsertActivityLog(log) => store.insert_activity_log(log).await?,
            }
        }
        self.pending.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewOrder, Order};

    fn order_with_id(id: i64) -> Order {
        let mut order = Order::create(
            NewOrder {
                locale: "en".to_string(),
                creator_id: None,
            },
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        order.order_id = id;
        order
    }

    #[test]
    fn test_reregistering_an_order_replaces_the_snapshot() {
        let mut uow = UnitOfWork::new();
        let mut order = order_with_id(7);
        uow.register_order(&order);

        order.order_number = Some("A-1".to_string());
        uow.register_order(&order);

        assert_eq!(uow.pending().len(), 1);
        match &uow.pending()[0] {
            PendingChange::UpsertOrder(o) => {
                assert_eq!(o.order_number.as_deref(), Some("A-1"));
            }
            other => panic!("unexpected change: {other:?}"),
        }
    }

    #[test]
    fn test_distinct_orders_keep_separate_slots() {
        let mut uow = UnitOfWork::new();
        uow.register_order(&order_with_id(1));
        uow.register_order(&order_with_id(2));
        uow.register_item_removal(9);
        assert_eq!(uow.pending().len(), 3);
    }
}
