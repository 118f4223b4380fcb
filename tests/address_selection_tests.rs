//! Address-selection component: event contract and the unsaved-edit guard.

use order_core::events::{AddressSelection, EventPublisher, SelectOutcome};
use order_core::models::OrderAddress;
use tokio::sync::broadcast::error::TryRecvError;

fn address(street: &str) -> OrderAddress {
    OrderAddress {
        first_name: Some("Erika".to_string()),
        last_name: Some("Muster".to_string()),
        street: Some(street.to_string()),
        number: Some("12".to_string()),
        zip: Some("1010".to_string()),
        city: Some("Vienna".to_string()),
        country: Some("Austria".to_string()),
        ..OrderAddress::empty()
    }
}

#[tokio::test]
async fn test_initialize_publishes_on_namespaced_channel() {
    let events = EventPublisher::default();
    let mut receiver = events.subscribe();

    let component = AddressSelection::initialize(events, None).await.unwrap();
    assert!(component.selected().is_none());

    let event = receiver.try_recv().unwrap();
    assert_eq!(event.name, "order.address_selection.initialized");
    assert_eq!(event.context["selected"], false);
}

#[tokio::test]
async fn test_select_without_edits_applies_and_publishes() {
    let events = EventPublisher::default();
    let mut receiver = events.subscribe();
    let mut component = AddressSelection::initialize(events, None).await.unwrap();
    receiver.try_recv().unwrap(); // drain initialized

    let outcome = component.select(address("Main Street")).await.unwrap();
    assert!(matches!(outcome, SelectOutcome::Applied));
    assert_eq!(
        component.selected().unwrap().street.as_deref(),
        Some("Main Street")
    );

    let event = receiver.try_recv().unwrap();
    assert_eq!(event.name, "order.address_selection.changed");
    assert_eq!(event.context["address"]["street"], "Main Street");
}

#[tokio::test]
async fn test_unsaved_edits_require_confirmation() {
    let events = EventPublisher::default();
    let mut receiver = events.subscribe();
    let mut component = AddressSelection::initialize(events, Some(address("Old Lane")))
        .await
        .unwrap();
    receiver.try_recv().unwrap();

    component.mark_edited();
    let outcome = component.select(address("New Road")).await.unwrap();
    let pending = match outcome {
        SelectOutcome::RequiresConfirmation(pending) => pending,
        SelectOutcome::Applied => panic!("expected confirmation to be required"),
    };

    // nothing published, nothing changed yet
    assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));

    pending.confirm().await.unwrap();
    assert_eq!(
        component.selected().unwrap().street.as_deref(),
        Some("New Road")
    );
    assert!(!component.has_unsaved_edits());
    let event = receiver.try_recv().unwrap();
    assert_eq!(event.name, "order.address_selection.changed");
}

#[tokio::test]
async fn test_dismiss_keeps_current_selection_and_edits() {
    let events = EventPublisher::default();
    let mut receiver = events.subscribe();
    let mut component = AddressSelection::initialize(events, Some(address("Old Lane")))
        .await
        .unwrap();
    receiver.try_recv().unwrap();

    component.mark_edited();
    match component.select(address("New Road")).await.unwrap() {
        SelectOutcome::RequiresConfirmation(pending) => pending.dismiss(),
        SelectOutcome::Applied => panic!("expected confirmation to be required"),
    }

    assert_eq!(
        component.selected().unwrap().street.as_deref(),
        Some("Old Lane")
    );
    assert!(component.has_unsaved_edits());
    assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_summary_renders_row_text() {
    let events = EventPublisher::default();
    let component = AddressSelection::initialize(events, Some(address("Main Street")))
        .await
        .unwrap();
    assert_eq!(
        component.summary(),
        "Erika Muster, Main Street 12, 1010 Vienna, Austria"
    );

    let empty = AddressSelection::initialize(EventPublisher::default(), None)
        .await
        .unwrap();
    assert_eq!(empty.summary(), "");
}
