// Persistence module for the order domain
//
// Lookups go through narrow async repository traits; writes are collected in
// an explicit unit of work owned by the caller and drained into an
// `OrderStore` when the caller decides to flush.

pub mod repositories;
pub mod unit_of_work;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use repositories::{
    AccountRepository, ContactRepository, OrderRepositories, OrderRepository, OrderStore,
    StatusRepository, TermsOfDeliveryRepository, TermsOfPaymentRepository, UserRepository,
};
pub use unit_of_work::{PendingChange, UnitOfWork};
