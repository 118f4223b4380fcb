#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Order Core
//!
//! Order-management business logic for an e-commerce backend.
//!
//! ## Overview
//!
//! The crate orchestrates the full life of an order aggregate: creation and
//! update through [`orchestration::OrderManager`], status transitions with
//! an immutable activity log and a bitmask status history, diff-based
//! line-item reconciliation, deferred batch recalculation of order totals,
//! and the locale-aware field descriptors backing the generic order list
//! view.
//!
//! Persistence is split into narrow repository traits for lookups and an
//! explicit, caller-owned [`persistence::UnitOfWork`] for writes - the
//! caller decides when registered changes are flushed into the store.
//! Postgres implementations (sqlx, runtime-checked queries) back every
//! seam; the test suite runs against in-memory fakes.
//!
//! ## Module Organization
//!
//! - [`models`] - Order aggregate, addresses, items, statuses, references
//! - [`input`] - typed boundary schema for the save payload
//! - [`orchestration`] - save workflow, item reconciliation, recalculation
//! - [`state_machine`] - status conversion and activity log
//! - [`persistence`] - repositories, unit of work, postgres backends
//! - [`list_builder`] - per-locale field descriptors for the list view
//! - [`events`] - broadcast publisher and the address-selection component
//! - [`config`] / [`error`] / [`logging`] / [`constants`] - ambient stack
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use order_core::config::OrderCoreConfig;
//! use order_core::persistence::UnitOfWork;
//!
//! let config = OrderCoreConfig::from_env().expect("config");
//! let uow = UnitOfWork::new();
//! println!(
//!     "order core initialized for locale {} ({} pending changes)",
//!     config.default_locale,
//!     uow.pending().len()
//! );
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod input;
pub mod list_builder;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod persistence;
pub mod state_machine;

pub use config::OrderCoreConfig;
pub use error::{OrderError, Result};
pub use events::{AddressSelection, EventPublisher};
pub use input::SaveOrderInput;
pub use list_builder::{FieldDescriptor, FieldDescriptorRegistry};
pub use orchestration::{OrderManager, RecalculationBatch};
pub use persistence::{OrderRepositories, UnitOfWork};
pub use state_machine::OrderStateMachine;
