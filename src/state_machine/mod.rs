// State machine module for order status lifecycle
//
// Statuses are reference entities; transitions append to an immutable
// activity log and maintain a bitmask of every status ever applied.

pub mod order_state_machine;

pub use order_state_machine::{OrderStateMachine, TransitionOutcome};
