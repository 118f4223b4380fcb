pub mod order;
pub mod order_activity_log;
pub mod order_address;
pub mod order_item;
pub mod order_status;
pub mod references;

// Re-export core models for easy access
pub use order::{NewOrder, Order};
pub use order_activity_log::{NewOrderActivityLog, OrderActivityLog};
pub use order_address::OrderAddress;
pub use order_item::{NewOrderItem, OrderItem};
pub use order_status::OrderStatus;
pub use references::{Account, Contact, TermsOfDelivery, TermsOfPayment, User};
