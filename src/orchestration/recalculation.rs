//! # Deferred Batch Recalculation
//!
//! Callers register item ids for later total recalculation without
//! triggering immediate work. The batch is an explicit value object owned by
//! the caller's request scope; processing resolves each scheduled id to its
//! owning order, deduplicates orders already handled in this batch, and
//! recalculates each order's total net price exactly once. Persisting the
//! result is left to the caller's flush.

use std::collections::HashSet;

use crate::error::Result;
use crate::persistence::{OrderRepository, UnitOfWork};

#[derive(Debug, Default)]
pub struct RecalculationBatch {
    scheduled_ids: Vec<i64>,
}

impl RecalculationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an item id for later recalculation. No work happens here.
    pub fn schedule_for_update(&mut self, item_id: i64) {
        self.scheduled_ids.push(item_id);
    }

    pub fn scheduled_ids(&self) -> &[i64] {
        &self.scheduled_ids
    }

    /// Recalculate the total net price of every order owning a scheduled
    /// item, once per order. The queue is cleared unconditionally, even
    /// when a lookup fails mid-batch. Returns the ids of the orders that
    /// were recalculated.
    pub async fn process_ids(
        &mut self,
        orders: &dyn OrderRepository,
        uow: &mut UnitOfWork,
    ) -> Result<Vec<i64>> {
        let scheduled = std::mem::take(&mut self.scheduled_ids);
        let mut processed: HashSet<i64> = HashSet::new();
        let mut recalculated = Vec::new();

        for item_id in scheduled {
            let order = match orders.find_by_item_id(item_id).await? {
                Some(order) => order,
                None => {
                    tracing::warn!(item_id, "Scheduled item has no owning order, skipping");
                    continue;
                }
            };

            if !processed.insert(order.order_id) {
                continue;
            }

            let mut order = order;
            order.recalculate_total_net_price();
            uow.register_order(&order);
            recalculated.push(order.order_id);
        }

        // Flush intentionally deferred; the caller owns the commit.
        Ok(recalculated)
    }
}
