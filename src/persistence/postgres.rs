//! # Postgres Persistence
//!
//! sqlx-backed implementations of the repository traits and the flush
//! target. Queries are runtime-checked (`sqlx::query_as::<_, T>`), so the
//! crate builds without a live database.
//!
//! ## Schema
//!
//! - `orders`: aggregate row, references both address snapshots
//! - `order_addresses`: one row per order and address type
//! - `order_items`: line items
//! - `order_statuses` / `order_activity_logs`: status reference + audit
//! - `accounts`, `contacts`, `terms_of_delivery`, `terms_of_payment`,
//!   `users`: read-only reference tables owned by other bundles

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::error::Result;
use crate::models::{
    Account, Contact, NewOrderActivityLog, Order, OrderAddress, OrderItem, OrderStatus,
    TermsOfDelivery, TermsOfPayment, User,
};
use crate::orchestration::items::ItemManager;
use crate::input::ItemInput;

use super::repositories::{
    AccountRepository, ContactRepository, OrderRepository, OrderStore, StatusRepository,
    TermsOfDeliveryRepository, TermsOfPaymentRepository, UserRepository,
};

/// Flat `orders` row; the aggregate is assembled from this plus the
/// address and item tables.
#[derive(Debug, FromRow)]
struct OrderRow {
    order_id: i64,
    order_number: Option<String>,
    currency: Option<String>,
    cost_centre: Option<String>,
    commission: Option<String>,
    tax_free: bool,
    customer_name: Option<String>,
    desired_delivery_date: Option<NaiveDateTime>,
    order_date: Option<NaiveDateTime>,
    status_id: Option<i32>,
    bitmask_status: i64,
    account_id: Option<i32>,
    contact_id: Option<i32>,
    responsible_contact_id: Option<i32>,
    terms_of_delivery_id: Option<i32>,
    terms_of_delivery_content: Option<String>,
    terms_of_payment_id: Option<i32>,
    terms_of_payment_content: Option<String>,
    total_net_price: f64,
    locale: String,
    creator_id: Option<i64>,
    changer_id: Option<i64>,
    created_at: NaiveDateTime,
    changed_at: NaiveDateTime,
}

const ORDER_COLUMNS: &str = "order_id, order_number, currency, cost_centre, commission, tax_free, \
     customer_name, desired_delivery_date, order_date, status_id, bitmask_status, account_id, \
     contact_id, responsible_contact_id, terms_of_delivery_id, terms_of_delivery_content, \
     terms_of_payment_id, terms_of_payment_content, total_net_price, locale, creator_id, \
     changer_id, created_at, changed_at";

#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn assemble(&self, row: OrderRow) -> Result<Order> {
        let addresses = sqlx::query_as::<_, AddressRow>(
            "SELECT address_type, address_id, first_name, last_name, account_name, title, street, \
             number, addition, city, zip, state, country, postbox_number, postbox_postcode, \
             postbox_city, email, phone, phone_mobile \
             FROM order_addresses WHERE order_id = $1",
        )
        .bind(row.order_id)
        .fetch_all(&self.pool)
        .await?;

        let mut invoice_address = OrderAddress::empty();
        let mut delivery_address = OrderAddress::empty();
        for address in addresses {
            match address.address_type.as_str() {
                "invoice" => invoice_address = address.into_address(),
                _ => delivery_address = address.into_address(),
            }
        }

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT item_id, order_id, name, item_number, quantity, price, discount_percent, \
             tax_rate, total_net_price \
             FROM order_items WHERE order_id = $1 ORDER BY item_id",
        )
        .bind(row.order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Order {
            order_id: row.order_id,
            order_number: row.order_number,
            currency: row.currency,
            cost_centre: row.cost_centre,
            commission: row.commission,
            tax_free: row.tax_free,
            customer_name: row.customer_name,
            desired_delivery_date: row.desired_delivery_date,
            order_date: row.order_date,
            status_id: row.status_id,
            bitmask_status: row.bitmask_status,
            account_id: row.account_id,
            contact_id: row.contact_id,
            responsible_contact_id: row.responsible_contact_id,
            terms_of_delivery_id: row.terms_of_delivery_id,
            terms_of_delivery_content: row.terms_of_delivery_content,
            terms_of_payment_id: row.terms_of_payment_id,
            terms_of_payment_content: row.terms_of_payment_content,
            total_net_price: row.total_net_price,
            invoice_address,
            delivery_address,
            items,
            locale: row.locale,
            creator_id: row.creator_id,
            changer_id: row.changer_id,
            created_at: row.created_at,
            changed_at: row.changed_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct AddressRow {
    address_type: String,
    address_id: i64,
    first_name: Option<String>,
    last_name: Option<String>,
    account_name: Option<String>,
    title: Option<String>,
    street: Option<String>,
    number: Option<String>,
    addition: Option<String>,
    city: Option<String>,
    zip: Option<String>,
    state: Option<String>,
    country: Option<String>,
    postbox_number: Option<String>,
    postbox_postcode: Option<String>,
    postbox_city: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    phone_mobile: Option<String>,
}

impl AddressRow {
    fn into_address(self) -> OrderAddress {
        OrderAddress {
            address_id: self.address_id,
            first_name: self.first_name,
            last_name: self.last_name,
            account_name: self.account_name,
            title: self.title,
            street: self.street,
            number: self.number,
            addition: self.addition,
            city: self.city,
            zip: self.zip,
            state: self.state,
            country: self.country,
            postbox_number: self.postbox_number,
            postbox_postcode: self.postbox_postcode,
            postbox_city: self.postbox_city,
            email: self.email,
            phone: self.phone,
            phone_mobile: self.phone_mobile,
        }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_id(&self, order_id: i64, locale: &str) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1 AND locale = $2"
        ))
        .bind(order_id)
        .bind(locale)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_item_id(&self, item_id: i64) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE order_id = (SELECT order_id FROM order_items WHERE item_id = $1)"
        ))
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl OrderStore for PgOrderRepository {
    async fn next_order_id(&self) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>("SELECT nextval('orders_order_id_seq')")
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn upsert_order(&self, order: &Order) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (order_id, order_number, currency, cost_centre, commission, \
             tax_free, customer_name, desired_delivery_date, order_date, status_id, \
             bitmask_status, account_id, contact_id, responsible_contact_id, \
             terms_of_delivery_id, terms_of_delivery_content, terms_of_payment_id, \
             terms_of_payment_content, total_net_price, locale, creator_id, changer_id, \
             created_at, changed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23, $24) \
             ON CONFLICT (order_id) DO UPDATE SET \
             order_number = EXCLUDED.order_number, currency = EXCLUDED.currency, \
             cost_centre = EXCLUDED.cost_centre, commission = EXCLUDED.commission, \
             tax_free = EXCLUDED.tax_free, customer_name = EXCLUDED.customer_name, \
             desired_delivery_date = EXCLUDED.desired_delivery_date, \
             order_date = EXCLUDED.order_date, status_id = EXCLUDED.status_id, \
             bitmask_status = EXCLUDED.bitmask_status, account_id = EXCLUDED.account_id, \
             contact_id = EXCLUDED.contact_id, \
             responsible_contact_id = EXCLUDED.responsible_contact_id, \
             terms_of_delivery_id = EXCLUDED.terms_of_delivery_id, \
             terms_of_delivery_content = EXCLUDED.terms_of_delivery_content, \
             terms_of_payment_id = EXCLUDED.terms_of_payment_id, \
             terms_of_payment_content = EXCLUDED.terms_of_payment_content, \
             total_net_price = EXCLUDED.total_net_price, changer_id = EXCLUDED.changer_id, \
             changed_at = EXCLUDED.changed_at",
        )
        .bind(order.order_id)
        .bind(&order.order_number)
        .bind(&order.currency)
        .bind(&order.cost_centre)
        .bind(&order.commission)
        .bind(order.tax_free)
        .bind(&order.customer_name)
        .bind(order.desired_delivery_date)
        .bind(order.order_date)
        .bind(order.status_id)
        .bind(order.bitmask_status)
        .bind(order.account_id)
        .bind(order.contact_id)
        .bind(order.responsible_contact_id)
        .bind(order.terms_of_delivery_id)
        .bind(&order.terms_of_delivery_content)
        .bind(order.terms_of_payment_id)
        .bind(&order.terms_of_payment_content)
        .bind(order.total_net_price)
        .bind(&order.locale)
        .bind(order.creator_id)
        .bind(order.changer_id)
        .bind(order.created_at)
        .bind(order.changed_at)
        .execute(&mut *tx)
        .await?;

        upsert_address(&mut tx, order.order_id, "invoice", &order.invoice_address).await?;
        upsert_address(&mut tx, order.order_id, "delivery", &order.delivery_address).await?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (item_id, order_id, name, item_number, quantity, \
                 price, discount_percent, tax_rate, total_net_price) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
                 ON CONFLICT (item_id) DO UPDATE SET \
                 name = EXCLUDED.name, item_number = EXCLUDED.item_number, \
                 quantity = EXCLUDED.quantity, price = EXCLUDED.price, \
                 discount_percent = EXCLUDED.discount_percent, tax_rate = EXCLUDED.tax_rate, \
                 total_net_price = EXCLUDED.total_net_price",
            )
            .bind(item.item_id)
            .bind(order.order_id)
            .bind(&item.name)
            .bind(&item.item_number)
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.discount_percent)
            .bind(item.tax_rate)
            .bind(item.total_net_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove_item(&self, item_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM order_items WHERE item_id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_activity_log(&self, log: &NewOrderActivityLog) -> Result<()> {
        sqlx::query(
            "INSERT INTO order_activity_logs (order_id, status_from, status_to, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(log.order_id)
        .bind(log.status_from)
        .bind(log.status_to)
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

async fn upsert_address(
    tx: &mut Transaction<'_, Postgres>,
    order_id: i64,
    address_type: &str,
    address: &OrderAddress,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO order_addresses (order_id, address_type, first_name, last_name, \
         account_name, title, street, number, addition, city, zip, state, country, \
         postbox_number, postbox_postcode, postbox_city, email, phone, phone_mobile) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
         $17, $18, $19) \
         ON CONFLICT (order_id, address_type) DO UPDATE SET \
         first_name = EXCLUDED.first_name, last_name = EXCLUDED.last_name, \
         account_name = EXCLUDED.account_name, title = EXCLUDED.title, \
         street = EXCLUDED.street, number = EXCLUDED.number, addition = EXCLUDED.addition, \
         city = EXCLUDED.city, zip = EXCLUDED.zip, state = EXCLUDED.state, \
         country = EXCLUDED.country, postbox_number = EXCLUDED.postbox_number, \
         postbox_postcode = EXCLUDED.postbox_postcode, postbox_city = EXCLUDED.postbox_city, \
         email = EXCLUDED.email, phone = EXCLUDED.phone, phone_mobile = EXCLUDED.phone_mobile",
    )
    .bind(order_id)
    .bind(address_type)
    .bind(&address.first_name)
    .bind(&address.last_name)
    .bind(&address.account_name)
    .bind(&address.title)
    .bind(&address.street)
    .bind(&address.number)
    .bind(&address.addition)
    .bind(&address.city)
    .bind(&address.zip)
    .bind(&address.state)
    .bind(&address.country)
    .bind(&address.postbox_number)
    .bind(&address.postbox_postcode)
    .bind(&address.postbox_city)
    .bind(&address.email)
    .bind(&address.phone)
    .bind(&address.phone_mobile)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

macro_rules! pg_reference_repository {
    ($repo:ident, $trait_name:ident, $entity:ty, $id_type:ty, $sql:expr) => {
        #[derive(Debug, Clone)]
        pub struct $repo {
            pool: PgPool,
        }

        impl $repo {
            pub fn new(pool: PgPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl $trait_name for $repo {
            async fn find_by_id(&self, id: $id_type) -> Result<Option<$entity>> {
                let entity = sqlx::query_as::<_, $entity>($sql)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
                Ok(entity)
            }
        }
    };
}

pg_reference_repository!(
    PgStatusRepository,
    StatusRepository,
    OrderStatus,
    i32,
    "SELECT status_id, name FROM order_statuses WHERE status_id = $1"
);

pg_reference_repository!(
    PgAccountRepository,
    AccountRepository,
    Account,
    i32,
    "SELECT account_id, name FROM accounts WHERE account_id = $1"
);

pg_reference_repository!(
    PgContactRepository,
    ContactRepository,
    Contact,
    i32,
    "SELECT contact_id, first_name, last_name FROM contacts WHERE contact_id = $1"
);

pg_reference_repository!(
    PgTermsOfDeliveryRepository,
    TermsOfDeliveryRepository,
    TermsOfDelivery,
    i32,
    "SELECT terms_id, terms FROM terms_of_delivery WHERE terms_id = $1"
);

pg_reference_repository!(
    PgTermsOfPaymentRepository,
    TermsOfPaymentRepository,
    TermsOfPayment,
    i32,
    "SELECT terms_id, terms FROM terms_of_payment WHERE terms_id = $1"
);

pg_reference_repository!(
    PgUserRepository,
    UserRepository,
    User,
    i64,
    "SELECT user_id, username FROM users WHERE user_id = $1"
);

/// Item lifecycle backed by the `order_items` sequence.
#[derive(Debug, Clone)]
pub struct PgItemManager {
    pool: PgPool,
}

impl PgItemManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemManager for PgItemManager {
    async fn create(&self, order_id: i64, input: &ItemInput) -> Result<OrderItem> {
        // Submitted ids are honored (items created elsewhere), otherwise
        // the sequence hands out a fresh one
        let item_id = match input.id {
            Some(id) => id,
            None => {
                sqlx::query_scalar::<_, i64>("SELECT nextval('order_items_item_id_seq')")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(crate::orchestration::items::build_item(
            item_id, order_id, input,
        ))
    }
}
