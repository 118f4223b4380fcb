//! # Address Selection Component
//!
//! Headless address-picker state holder. It owns an optional selected
//! address plus a dirty flag for unsaved edits, publishes
//! `order.address_selection.*` events on the shared channel and renders a
//! read-only one-line summary for row display. Replacing a selection that
//! carries unsaved edits requires explicit confirmation through a
//! [`PendingSelection`] token.
//!
//! The component never touches the order-save workflow; consumers observe
//! it solely through the event channel.

use serde_json::json;

use crate::constants::events as event_names;
use crate::models::OrderAddress;

use super::publisher::{EventPublisher, PublishError};

pub struct AddressSelection {
    events: EventPublisher,
    selected: Option<OrderAddress>,
    unsaved_edits: bool,
}

/// Outcome of a selection attempt.
pub enum SelectOutcome<'a> {
    /// The selection was applied and a changed event published.
    Applied,
    /// Unsaved edits exist; the caller must confirm or dismiss.
    RequiresConfirmation(PendingSelection<'a>),
}

/// Confirmation token for a selection change over unsaved edits.
///
/// Nothing is published until [`confirm`](PendingSelection::confirm);
/// dropping or [`dismiss`](PendingSelection::dismiss)ing keeps the current
/// selection untouched.
pub struct PendingSelection<'a> {
    component: &'a mut AddressSelection,
    address: OrderAddress,
}

impl AddressSelection {
    /// Create the component and publish the initialized event.
    pub async fn initialize(
        events: EventPublisher,
        initial: Option<OrderAddress>,
    ) -> Result<Self, PublishError> {
        events
            .publish(
                event_names::ADDRESS_SELECTION_INITIALIZED,
                json!({ "selected": initial.is_some() }),
            )
            .await?;
        Ok(Self {
            events,
            selected: initial,
            unsaved_edits: false,
        })
    }

    pub fn selected(&self) -> Option<&OrderAddress> {
        self.selected.as_ref()
    }

    /// Flag that the current selection carries unsaved edits.
    pub fn mark_edited(&mut self) {
        self.unsaved_edits = true;
    }

    /// Clear the unsaved-edits flag, typically after a save.
    pub fn mark_saved(&mut self) {
        self.unsaved_edits = false;
    }

    pub fn has_unsaved_edits(&self) -> bool {
        self.unsaved_edits
    }

    /// Attempt to replace the selection.
    ///
    /// Without unsaved edits the change applies immediately and a changed
    /// event is published. With unsaved edits a confirmation token is
    /// returned instead and nothing happens yet.
    pub async fn select(
        &mut self,
        address: OrderAddress,
    ) -> Result<SelectOutcome<'_>, PublishError> {
        if self.unsaved_edits {
            return Ok(SelectOutcome::RequiresConfirmation(PendingSelection {
                component: self,
                address,
            }));
        }
        self.apply(address).await?;
        Ok(SelectOutcome::Applied)
    }

    /// Read-only row summary of the selected address.
    pub fn summary(&self) -> String {
        let Some(address) = &self.selected else {
            return String::new();
        };

        let name = address.account_name.clone().unwrap_or_else(|| {
            [address.first_name.as_deref(), address.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ")
        });

        let street = [address.street.as_deref(), address.number.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let city = [address.zip.as_deref(), address.city.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        [
            Some(name),
            Some(street),
            Some(city),
            address.country.clone(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    async fn apply(&mut self, address: OrderAddress) -> Result<(), PublishError> {
        let payload = serde_json::to_value(&address)?;
        self.selected = Some(address);
        self.unsaved_edits = false;
        self.events
            .publish(
                event_names::ADDRESS_SELECTION_CHANGED,
                json!({ "address": payload }),
            )
            .await
    }
}

impl PendingSelection<'_> {
    /// Apply the pending change, discarding the unsaved edits.
    pub async fn confirm(self) -> Result<(), PublishError> {
        self.component.apply(self.address).await
    }

    /// Keep the current selection and its edits.
    pub fn dismiss(self) {}
}
