// Orchestration of the order workflows: the save sequence, line-item
// reconciliation and deferred batch recalculation.

pub mod items;
pub mod manager;
pub mod recalculation;

pub use items::{plan_reconciliation, reconcile_items, ItemManager, ReconciliationPlan};
pub use manager::OrderManager;
pub use recalculation::RecalculationBatch;
