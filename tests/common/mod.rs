//! In-memory fakes for the persistence seams, shared by the integration
//! tests. Seeded with a small set of reference entities.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use order_core::error::{OrderError, Result};
use order_core::events::EventPublisher;
use order_core::input::ItemInput;
use order_core::models::{
    Account, Contact, NewOrderActivityLog, Order, OrderItem, OrderStatus, TermsOfDelivery,
    TermsOfPayment, User,
};
use order_core::orchestration::items::{build_item, ItemManager};
use order_core::orchestration::OrderManager;
use order_core::persistence::{
    AccountRepository, ContactRepository, OrderRepositories, OrderRepository, OrderStore,
    StatusRepository, TermsOfDeliveryRepository, TermsOfPaymentRepository, UserRepository,
};

#[derive(Default)]
pub struct InMemoryStore {
    next_order_id: AtomicI64,
    pub orders: Mutex<HashMap<i64, Order>>,
    pub removed_items: Mutex<Vec<i64>>,
    pub activity_logs: Mutex<Vec<NewOrderActivityLog>>,
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn next_order_id(&self) -> Result<i64> {
        Ok(self.next_order_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn upsert_order(&self, order: &Order) -> Result<()> {
        self.orders.lock().insert(order.order_id, order.clone());
        Ok(())
    }

    async fn remove_item(&self, item_id: i64) -> Result<()> {
        self.removed_items.lock().push(item_id);
        for order in self.orders.lock().values_mut() {
            order.items.retain(|item| item.item_id != item_id);
        }
        Ok(())
    }

    async fn insert_activity_log(&self, log: &NewOrderActivityLog) -> Result<()> {
        self.activity_logs.lock().push(log.clone());
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn find_by_id(&self, order_id: i64, locale: &str) -> Result<Option<Order>> {
        Ok(self
            .orders
            .lock()
            .get(&order_id)
            .filter(|order| order.locale == locale)
            .cloned())
    }

    async fn find_by_item_id(&self, item_id: i64) -> Result<Option<Order>> {
        Ok(self
            .orders
            .lock()
            .values()
            .find(|order| order.items.iter().any(|item| item.item_id == item_id))
            .cloned())
    }
}

macro_rules! in_memory_reference_repository {
    ($repo:ident, $trait_name:ident, $entity:ty, $id_type:ty) => {
        #[derive(Default)]
        pub struct $repo {
            entities: HashMap<$id_type, $entity>,
        }

        impl $repo {
            pub fn with(entities: Vec<$entity>, key: fn(&$entity) -> $id_type) -> Self {
                Self {
                    entities: entities
                        .into_iter()
                        .map(|entity| (key(&entity), entity))
                        .collect(),
                }
            }
        }

        #[async_trait]
        impl $trait_name for $repo {
            async fn find_by_id(&self, id: $id_type) -> Result<Option<$entity>> {
                Ok(self.entities.get(&id).cloned())
            }
        }
    };
}

in_memory_reference_repository!(InMemoryStatusRepository, StatusRepository, OrderStatus, i32);
in_memory_reference_repository!(InMemoryAccountRepository, AccountRepository, Account, i32);
in_memory_reference_repository!(InMemoryContactRepository, ContactRepository, Contact, i32);
in_memory_reference_repository!(
    InMemoryTermsOfDeliveryRepository,
    TermsOfDeliveryRepository,
    TermsOfDelivery,
    i32
);
in_memory_reference_repository!(
    InMemoryTermsOfPaymentRepository,
    TermsOfPaymentRepository,
    TermsOfPayment,
    i32
);
in_memory_reference_repository!(InMemoryUserRepository, UserRepository, User, i64);

#[derive(Default)]
pub struct InMemoryItemManager {
    next_item_id: AtomicI64,
}

#[async_trait]
impl ItemManager for InMemoryItemManager {
    async fn create(&self, order_id: i64, input: &ItemInput) -> Result<OrderItem> {
        let item_id = match input.id {
            Some(id) => id,
            None => 1000 + self.next_item_id.fetch_add(1, Ordering::SeqCst) + 1,
        };
        Ok(build_item(item_id, order_id, input))
    }
}

/// Item manager whose creations always fail, for processing-error tests.
pub struct FailingItemManager;

#[async_trait]
impl ItemManager for FailingItemManager {
    async fn create(&self, _order_id: i64, _input: &ItemInput) -> Result<OrderItem> {
        Err(OrderError::missing_attribute("price"))
    }
}

pub struct TestEnv {
    pub store: Arc<InMemoryStore>,
    pub statuses: Arc<InMemoryStatusRepository>,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub contacts: Arc<InMemoryContactRepository>,
    pub terms_of_delivery: Arc<InMemoryTermsOfDeliveryRepository>,
    pub terms_of_payment: Arc<InMemoryTermsOfPaymentRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub item_manager: Arc<InMemoryItemManager>,
    pub events: EventPublisher,
}

impl TestEnv {
    pub fn new() -> Self {
        let statuses = (1..=6)
            .map(|status_id| OrderStatus {
                status_id,
                name: format!("salesorder.status.{status_id}"),
            })
            .collect();

        Self {
            store: Arc::new(InMemoryStore::default()),
            statuses: Arc::new(InMemoryStatusRepository::with(statuses, |s| s.status_id)),
            accounts: Arc::new(InMemoryAccountRepository::with(
                vec![Account {
                    account_id: 10,
                    name: "Acme GmbH".to_string(),
                }],
                |a| a.account_id,
            )),
            contacts: Arc::new(InMemoryContactRepository::with(
                vec![Contact {
                    contact_id: 9,
                    first_name: "Erika".to_string(),
                    last_name: "Muster".to_string(),
                }],
                |c| c.contact_id,
            )),
            terms_of_delivery: Arc::new(InMemoryTermsOfDeliveryRepository::with(
                vec![TermsOfDelivery {
                    terms_id: 3,
                    terms: "DDP incoterms".to_string(),
                }],
                |t| t.terms_id,
            )),
            terms_of_payment: Arc::new(InMemoryTermsOfPaymentRepository::with(
                vec![TermsOfPayment {
                    terms_id: 4,
                    terms: "30 days net".to_string(),
                }],
                |t| t.terms_id,
            )),
            users: Arc::new(InMemoryUserRepository::with(
                vec![User {
                    user_id: 42,
                    username: "admin".to_string(),
                }],
                |u| u.user_id,
            )),
            item_manager: Arc::new(InMemoryItemManager::default()),
            events: EventPublisher::default(),
        }
    }

    pub fn repositories(&self) -> OrderRepositories {
        OrderRepositories {
            orders: self.store.clone(),
            statuses: self.statuses.clone(),
            accounts: self.accounts.clone(),
            contacts: self.contacts.clone(),
            terms_of_delivery: self.terms_of_delivery.clone(),
            terms_of_payment: self.terms_of_payment.clone(),
            users: self.users.clone(),
        }
    }

    pub fn manager(&self) -> OrderManager {
        OrderManager::new(
            self.repositories(),
            self.item_manager.clone(),
            self.store.clone(),
            self.events.clone(),
        )
    }

    /// Manager wired with the failing item manager.
    pub fn manager_with_failing_items(&self) -> OrderManager {
        OrderManager::new(
            self.repositories(),
            Arc::new(FailingItemManager),
            self.store.clone(),
            self.events.clone(),
        )
    }
}
