//! # Line Item Reconciliation
//!
//! Diff-based add/update/remove of an order's line items against submitted
//! data. The diff is computed as an explicit [`ReconciliationPlan`] keyed by
//! item id, then applied through an [`ItemManager`] that owns item creation.
//! Any failure during application is rethrown as a single order-level
//! processing error carrying the original message.

use async_trait::async_trait;

use crate::error::{OrderError, Result};
use crate::input::ItemInput;
use crate::models::{Order, OrderItem};
use crate::persistence::UnitOfWork;

/// Lifecycle hooks for line items. Creation is backend-specific (id
/// assignment); updates share the field-merge logic below.
#[async_trait]
pub trait ItemManager: Send + Sync {
    /// Build a new item for the order from the submitted record.
    async fn create(&self, order_id: i64, input: &ItemInput) -> Result<OrderItem>;

    /// Merge submitted fields into an existing item.
    fn apply(&self, item: &mut OrderItem, input: &ItemInput) {
        apply_input(item, input);
    }
}

/// Typed reconciliation plan: who gets created, updated, removed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReconciliationPlan {
    pub create: Vec<ItemInput>,
    pub update: Vec<(i64, ItemInput)>,
    pub remove: Vec<i64>,
}

/// Compute the plan from the order's current items and the submission.
///
/// Identity key is the item id: submitted records whose id matches a current
/// item are updates, all other submitted records are creations, and current
/// items absent from the submission are removals.
pub fn plan_reconciliation(current: &[OrderItem], submitted: &[ItemInput]) -> ReconciliationPlan {
    let mut plan = ReconciliationPlan::default();

    for input in submitted {
        match input.id {
            Some(id) if current.iter().any(|item| item.item_id == id) => {
                plan.update.push((id, input.clone()));
            }
            _ => plan.create.push(input.clone()),
        }
    }

    for item in current {
        let retained = submitted.iter().any(|input| input.id == Some(item.item_id));
        if !retained {
            plan.remove.push(item.item_id);
        }
    }

    plan
}

/// Apply a full reconciliation of `submitted` onto the order's items.
///
/// Removals are registered with the unit of work; the aggregate is mutated
/// in place. Errors are wrapped as [`OrderError::Processing`].
pub async fn reconcile_items(
    order: &mut Order,
    submitted: &[ItemInput],
    manager: &dyn ItemManager,
    uow: &mut UnitOfWork,
) -> Result<()> {
    apply_plan(order, submitted, manager, uow)
        .await
        .map_err(|source| OrderError::Processing(source.to_string()))
}

async fn apply_plan(
    order: &mut Order,
    submitted: &[ItemInput],
    manager: &dyn ItemManager,
    uow: &mut UnitOfWork,
) -> Result<()> {
    let plan = plan_reconciliation(&order.items, submitted);

    for item_id in &plan.remove {
        order.items.retain(|item| item.item_id != *item_id);
        uow.register_item_removal(*item_id);
    }

    for (item_id, input) in &plan.update {
        if let Some(item) = order.find_item_mut(*item_id) {
            manager.apply(item, input);
        }
    }

    for input in &plan.create {
        let item = manager.create(order.order_id, input).await?;
        order.items.push(item);
    }

    tracing::debug!(
        order_id = order.order_id,
        created = plan.create.len(),
        updated = plan.update.len(),
        removed = plan.remove.len(),
        "Reconciled order items"
    );

    Ok(())
}

/// Merge submitted fields into an item and recompute its net total.
pub fn apply_input(item: &mut OrderItem, input: &ItemInput) {
    if let Some(name) = &input.name {
        item.name = Some(name.clone());
    }
    if let Some(item_number) = &input.item_number {
        item.item_number = Some(item_number.clone());
    }
    if let Some(quantity) = input.quantity {
        item.quantity = quantity;
    }
    if let Some(price) = input.price {
        item.price = price;
    }
    if let Some(discount) = input.discount_percent {
        item.discount_percent = discount;
    }
    if let Some(tax_rate) = input.tax_rate {
        item.tax_rate = tax_rate;
    }
    item.total_net_price =
        OrderItem::calculate_total_net_price(item.quantity, item.price, item.discount_percent);
}

/// Construct a fresh item from a submitted record. Used by `ItemManager`
/// implementations once they have assigned an id.
pub fn build_item(item_id: i64, order_id: i64, input: &ItemInput) -> OrderItem {
    let quantity = input.quantity.unwrap_or(1.0);
    let price = input.price.unwrap_or(0.0);
    let discount_percent = input.discount_percent.unwrap_or(0.0);
    OrderItem {
        item_id,
        order_id,
        name: input.name.clone(),
        item_number: input.item_number.clone(),
        quantity,
        price,
        discount_percent,
        tax_rate: input.tax_rate.unwrap_or(0.0),
        total_net_price: OrderItem::calculate_total_net_price(quantity, price, discount_percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn current_items(ids: &[i64]) -> Vec<OrderItem> {
        ids.iter().map(|id| OrderItem::sample(*id, 1)).collect()
    }

    #[test]
    fn test_plan_partitions_submission() {
        let current = current_items(&[1, 2]);
        let submitted = vec![
            ItemInput {
                id: Some(1),
                ..ItemInput::default()
            },
            ItemInput {
                id: Some(3),
                ..ItemInput::default()
            },
        ];

        let plan = plan_reconciliation(&current, &submitted);
        assert_eq!(plan.update.len(), 1);
        assert_eq!(plan.update[0].0, 1);
        assert_eq!(plan.create.len(), 1);
        assert_eq!(plan.create[0].id, Some(3));
        assert_eq!(plan.remove, vec![2]);
    }

    #[test]
    fn test_records_without_id_are_creations() {
        let plan = plan_reconciliation(&current_items(&[4]), &[ItemInput::default()]);
        assert_eq!(plan.create.len(), 1);
        assert_eq!(plan.remove, vec![4]);
    }

    #[test]
    fn test_empty_submission_removes_everything() {
        let plan = plan_reconciliation(&current_items(&[1, 2, 3]), &[]);
        assert!(plan.create.is_empty());
        assert!(plan.update.is_empty());
        assert_eq!(plan.remove, vec![1, 2, 3]);
    }

    #[test]
    fn test_apply_input_recomputes_total() {
        let mut item = OrderItem::sample(1, 1);
        apply_input(
            &mut item,
            &ItemInput {
                quantity: Some(3.0),
                price: Some(4.0),
                ..ItemInput::default()
            },
        );
        assert_eq!(item.total_net_price, 12.0);
    }

    proptest! {
        // Every current item ends up either updated or removed, never both;
        // every submitted record ends up created or updated.
        #[test]
        fn prop_plan_is_a_partition(
            current_ids in proptest::collection::hash_set(1i64..50, 0..8),
            submitted_ids in proptest::collection::hash_set(1i64..50, 0..8),
        ) {
            let current: Vec<OrderItem> = current_ids
                .iter()
                .map(|id| OrderItem::sample(*id, 1))
                .collect();
            let submitted: Vec<ItemInput> = submitted_ids
                .iter()
                .map(|id| ItemInput { id: Some(*id), ..ItemInput::default() })
                .collect();

            let plan = plan_reconciliation(&current, &submitted);

            for id in &current_ids {
                let updated = plan.update.iter().any(|(uid, _)| uid == id);
                let removed = plan.remove.contains(id);
                prop_assert!(updated ^ removed);
            }
            for id in &submitted_ids {
                let created = plan.create.iter().any(|input| input.id == Some(*id));
                let updated = plan.update.iter().any(|(uid, _)| uid == id);
                prop_assert!(created ^ updated);
            }
        }
    }
}
