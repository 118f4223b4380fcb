// Event system foundation
//
// A single broadcast channel carries namespaced lifecycle events (see
// `constants::events`). The address-selection component lives here because
// it communicates with the rest of the system exclusively through this
// channel.

pub mod address_selection;
pub mod publisher;

pub use address_selection::{AddressSelection, PendingSelection, SelectOutcome};
pub use publisher::{EventPublisher, PublishError, PublishedEvent};
