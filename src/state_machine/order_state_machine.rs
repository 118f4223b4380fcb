//! # Order State Machine
//!
//! Converts a requested status id into a status entity, records a
//! before/after activity-log entry and maintains the order's bitmask status
//! history.
//!
//! ## Bitmask semantics
//!
//! The bitmask records every status ever applied, with the bit position
//! equal to the status id. When the target status bit is already set the
//! transition is treated as stepping back: the bit of the *current* status
//! is cleared instead of setting anything. This mirrors the historical
//! behavior of the system exactly and is intentionally not normalized.

use chrono::Utc;

use crate::constants::events as event_names;
use crate::error::{OrderError, Result};
use crate::events::EventPublisher;
use crate::logging::log_status_transition;
use crate::models::{NewOrderActivityLog, Order};
use crate::persistence::{StatusRepository, UnitOfWork};

/// Result of a transition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The order already carried the target status; nothing happened.
    NoOp,
    Transitioned,
}

pub struct OrderStateMachine<'a> {
    statuses: &'a dyn StatusRepository,
    events: &'a EventPublisher,
}

impl<'a> OrderStateMachine<'a> {
    pub fn new(statuses: &'a dyn StatusRepository, events: &'a EventPublisher) -> Self {
        Self { statuses, events }
    }

    /// Transition the order to `target_status_id`.
    ///
    /// No-op when the order already has the target status. The target id
    /// must resolve to a status entity. An activity-log record is
    /// registered with the unit of work; flushing is the caller's call.
    pub async fn transition(
        &self,
        order: &mut Order,
        target_status_id: i32,
        uow: &mut UnitOfWork,
    ) -> Result<TransitionOutcome> {
        if order.status_id == Some(target_status_id) {
            return Ok(TransitionOutcome::NoOp);
        }

        let status = self
            .statuses
            .find_by_id(target_status_id)
            .await?
            .ok_or_else(|| OrderError::not_found("order status", target_status_id as i64))?;

        let previous_status_id = order.status_id;

        uow.register_activity_log(NewOrderActivityLog {
            order_id: order.order_id,
            status_from: previous_status_id,
            status_to: status.status_id,
            created_at: Utc::now().naive_utc(),
        });

        if order.has_status_flag(target_status_id) {
            // Target bit already set: stepping back, clear the current bit
            if let Some(current) = previous_status_id {
                order.clear_status_flag(current);
            }
        } else {
            order.set_status_flag(target_status_id);
        }

        order.status_id = Some(status.status_id);

        log_status_transition(
            order.order_id,
            previous_status_id,
            status.status_id,
            order.bitmask_status,
        );

        self.events
            .publish_or_log(
                event_names::ORDER_STATUS_CHANGED,
                serde_json::json!({
                    "orderId": order.order_id,
                    "from": previous_status_id,
                    "to": status.status_id,
                }),
            )
            .await;

        Ok(TransitionOutcome::Transitioned)
    }
}
