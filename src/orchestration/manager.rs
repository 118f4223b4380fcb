//! # Order Manager
//!
//! Orchestrates create and update of the order aggregate: validates the
//! payload, resolves referenced entities through the repositories, copies
//! address snapshots, converts the status, reconciles line items and
//! registers the result with the caller's unit of work.
//!
//! ## Save sequence
//!
//! 1. Required-field check (both address blocks must be present)
//! 2. Load the existing aggregate by id+locale, or create a fresh one
//! 3. Copy scalar and date fields present in the payload
//! 4. Resolve terms of delivery/payment, account, contacts (fail on
//!    unknown ids)
//! 5. Convert the status when one was requested (always on creation)
//! 6. Derive the customer display name and repopulate both addresses
//! 7. Reconcile line items and recompute the order total
//! 8. Stamp changed metadata, register with the unit of work, flush on
//!    request

use std::sync::Arc;

use chrono::Utc;

use crate::constants::{events as event_names, status};
use crate::error::{OrderError, Result};
use crate::events::EventPublisher;
use crate::input::{AddressInput, SaveOrderInput};
use crate::logging::log_order_operation;
use crate::models::{Account, Contact, NewOrder, Order, OrderAddress};
use crate::persistence::{OrderRepositories, OrderStore, UnitOfWork};
use crate::state_machine::OrderStateMachine;

use super::items::{reconcile_items, ItemManager};

pub struct OrderManager {
    repositories: OrderRepositories,
    item_manager: Arc<dyn ItemManager>,
    store: Arc<dyn OrderStore>,
    events: EventPublisher,
}

impl OrderManager {
    pub fn new(
        repositories: OrderRepositories,
        item_manager: Arc<dyn ItemManager>,
        store: Arc<dyn OrderStore>,
        events: EventPublisher,
    ) -> Self {
        Self {
            repositories,
            item_manager,
            store,
            events,
        }
    }

    /// Create or update an order aggregate from the payload.
    ///
    /// `order_id` selects an existing aggregate (found by id+locale, else
    /// [`OrderError::NotFound`]); without it a new one is created. A
    /// requested `status_id` triggers status conversion; creation defaults
    /// to the created sentinel when none is given. With `flush` the unit of
    /// work is drained into the store before returning, otherwise all
    /// registered changes stay pending for the caller to batch.
    #[allow(clippy::too_many_arguments)]
    pub async fn save(
        &self,
        input: &SaveOrderInput,
        locale: &str,
        user_id: Option<i64>,
        order_id: Option<i64>,
        status_id: Option<i32>,
        uow: &mut UnitOfWork,
        flush: bool,
    ) -> Result<Order> {
        let (invoice_input, delivery_input) = input.require_addresses()?;

        let now = Utc::now().naive_utc();
        let acting_user_id = self.resolve_acting_user(user_id).await?;

        let (mut order, created) = match order_id {
            Some(id) => {
                let order = self
                    .repositories
                    .orders
                    .find_by_id(id, locale)
                    .await?
                    .ok_or_else(|| OrderError::not_found("order", id))?;
                (order, false)
            }
            None => {
                let mut order = Order::create(
                    NewOrder {
                        locale: locale.to_string(),
                        creator_id: acting_user_id,
                    },
                    now,
                );
                order.order_id = self.store.next_order_id().await?;
                uow.register_order(&order);
                (order, true)
            }
        };

        self.apply_scalar_fields(&mut order, input)?;
        self.apply_terms(&mut order, input).await?;
        let account = self.apply_account(&mut order, input).await?;
        let contact = self.resolve_contact(&mut order, input).await?;
        self.resolve_responsible_contact(&mut order, input).await?;

        let requested_status = if created {
            status_id.or(Some(status::CREATED))
        } else {
            status_id
        };
        if let Some(target) = requested_status {
            let state_machine =
                OrderStateMachine::new(self.repositories.statuses.as_ref(), &self.events);
            state_machine.transition(&mut order, target, uow).await?;
        }

        order.customer_name = Some(resolve_customer_name(
            account.as_ref(),
            contact.as_ref(),
            invoice_input,
        )?);

        populate_address(
            &mut order.invoice_address,
            invoice_input,
            contact.as_ref(),
            account.as_ref(),
        );
        populate_address(
            &mut order.delivery_address,
            delivery_input,
            contact.as_ref(),
            account.as_ref(),
        );

        if let Some(items) = &input.items {
            reconcile_items(&mut order, items, self.item_manager.as_ref(), uow).await?;
            order.recalculate_total_net_price();
        }

        order.changed_at = now;
        order.changer_id = acting_user_id;
        uow.register_order(&order);

        let event_name = if created {
            event_names::ORDER_CREATED
        } else {
            event_names::ORDER_SAVED
        };
        self.events
            .publish_or_log(
                event_name,
                serde_json::json!({ "orderId": order.order_id, "locale": locale }),
            )
            .await;

        if flush {
            uow.flush(self.store.as_ref()).await?;
        }

        log_order_operation(
            if created { "create" } else { "update" },
            Some(order.order_id),
            Some(locale),
            if flush { "flushed" } else { "pending" },
            None,
        );

        Ok(order)
    }

    /// Transition an existing order to a new status outside a full save.
    pub async fn convert_status(
        &self,
        order: &mut Order,
        status_id: i32,
        uow: &mut UnitOfWork,
        flush: bool,
    ) -> Result<()> {
        let state_machine =
            OrderStateMachine::new(self.repositories.statuses.as_ref(), &self.events);
        state_machine.transition(order, status_id, uow).await?;
        uow.register_order(order);
        if flush {
            uow.flush(self.store.as_ref()).await?;
        }
        Ok(())
    }

    async fn resolve_acting_user(&self, user_id: Option<i64>) -> Result<Option<i64>> {
        match user_id {
            Some(id) => Ok(self
                .repositories
                .users
                .find_by_id(id)
                .await?
                .map(|user| user.user_id)),
            None => Ok(None),
        }
    }

    fn apply_scalar_fields(&self, order: &mut Order, input: &SaveOrderInput) -> Result<()> {
        if let Some(order_number) = &input.order_number {
            order.order_number = Some(order_number.clone());
        }
        if let Some(currency) = &input.currency {
            order.currency = Some(currency.clone());
        }
        if let Some(cost_centre) = &input.cost_centre {
            order.cost_centre = Some(cost_centre.clone());
        }
        if let Some(commission) = &input.commission {
            order.commission = Some(commission.clone());
        }
        if let Some(tax_free) = input.taxfree {
            order.tax_free = tax_free;
        }
        if let Some(date) = &input.desired_delivery_date {
            order.desired_delivery_date = Some(date.resolve("desiredDeliveryDate")?);
        }
        if let Some(date) = &input.order_date {
            order.order_date = Some(date.resolve("orderDate")?);
        }
        Ok(())
    }

    /// Terms reference and denormalized content are set together; a missing
    /// reference clears both; explicit override content always wins.
    async fn apply_terms(&self, order: &mut Order, input: &SaveOrderInput) -> Result<()> {
        match &input.terms_of_delivery {
            Some(reference) => {
                let terms = self
                    .repositories
                    .terms_of_delivery
                    .find_by_id(reference.id)
                    .await?
                    .ok_or_else(|| {
                        OrderError::dependency_not_found("terms of delivery", reference.id as i64)
                    })?;
                order.terms_of_delivery_id = Some(terms.terms_id);
                order.terms_of_delivery_content = Some(terms.terms);
            }
            None => {
                order.terms_of_delivery_id = None;
                order.terms_of_delivery_content = None;
            }
        }
        if let Some(content) = &input.terms_of_delivery_content {
            order.terms_of_delivery_content = Some(content.clone());
        }

        match &input.terms_of_payment {
            Some(reference) => {
                let terms = self
                    .repositories
                    .terms_of_payment
                    .find_by_id(reference.id)
                    .await?
                    .ok_or_else(|| {
                        OrderError::dependency_not_found("terms of payment", reference.id as i64)
                    })?;
                order.terms_of_payment_id = Some(terms.terms_id);
                order.terms_of_payment_content = Some(terms.terms);
            }
            None => {
                order.terms_of_payment_id = None;
                order.terms_of_payment_content = None;
            }
        }
        if let Some(content) = &input.terms_of_payment_content {
            order.terms_of_payment_content = Some(content.clone());
        }

        Ok(())
    }

    async fn apply_account(
        &self,
        order: &mut Order,
        input: &SaveOrderInput,
    ) -> Result<Option<Account>> {
        match &input.account {
            Some(reference) => {
                let account = self
                    .repositories
                    .accounts
                    .find_by_id(reference.id)
                    .await?
                    .ok_or_else(|| {
                        OrderError::dependency_not_found("account", reference.id as i64)
                    })?;
                order.account_id = Some(account.account_id);
                Ok(Some(account))
            }
            None => {
                order.account_id = None;
                Ok(None)
            }
        }
    }

    /// Resolve the contact when the payload supplies one; otherwise fall
    /// back to the contact already linked to the order (needed for name
    /// and address derivation).
    async fn resolve_contact(
        &self,
        order: &mut Order,
        input: &SaveOrderInput,
    ) -> Result<Option<Contact>> {
        match &input.contact {
            Some(reference) => {
                let contact = self
                    .repositories
                    .contacts
                    .find_by_id(reference.id)
                    .await?
                    .ok_or_else(|| {
                        OrderError::dependency_not_found("contact", reference.id as i64)
                    })?;
                order.contact_id = Some(contact.contact_id);
                Ok(Some(contact))
            }
            None => match order.contact_id {
                Some(id) => Ok(self.repositories.contacts.find_by_id(id).await?),
                None => Ok(None),
            },
        }
    }

    async fn resolve_responsible_contact(
        &self,
        order: &mut Order,
        input: &SaveOrderInput,
    ) -> Result<()> {
        if let Some(reference) = &input.responsible_contact {
            let contact = self
                .repositories
                .contacts
                .find_by_id(reference.id)
                .await?
                .ok_or_else(|| {
                    OrderError::dependency_not_found("responsible contact", reference.id as i64)
                })?;
            order.responsible_contact_id = Some(contact.contact_id);
        }
        Ok(())
    }
}

/// Account name takes precedence; otherwise the contact's full name, taken
/// from explicit first/last fields in the invoice address or the linked
/// contact. Neither present is a missing-attribute error.
fn resolve_customer_name(
    account: Option<&Account>,
    contact: Option<&Contact>,
    invoice_address: &AddressInput,
) -> Result<String> {
    if let Some(account) = account {
        return Ok(account.name.clone());
    }
    if let (Some(first_name), Some(last_name)) =
        (&invoice_address.first_name, &invoice_address.last_name)
    {
        return Ok(format!("{first_name} {last_name}"));
    }
    if let Some(contact) = contact {
        return Ok(contact.full_name());
    }
    Err(OrderError::missing_attribute("contact"))
}

/// Full overwrite of an address snapshot from the payload plus the resolved
/// contact/account. Absent payload fields fall back to the contact/account
/// where one applies, else empty.
fn populate_address(
    address: &mut OrderAddress,
    input: &AddressInput,
    contact: Option<&Contact>,
    account: Option<&Account>,
) {
    address.first_name = input
        .first_name
        .clone()
        .or_else(|| contact.map(|c| c.first_name.clone()));
    address.last_name = input
        .last_name
        .clone()
        .or_else(|| contact.map(|c| c.last_name.clone()));
    address.account_name = input
        .account_name
        .clone()
        .or_else(|| account.map(|a| a.name.clone()));
    address.title = input.title.clone();
    address.street = input.street.clone();
    address.number = input.number.clone();
    address.addition = input.addition.clone();
    address.city = input.city.clone();
    address.zip = input.zip.clone();
    address.state = input.state.clone();
    address.country = input.country.clone();
    address.postbox_number = input.postbox_number.clone();
    address.postbox_postcode = input.postbox_postcode.clone();
    address.postbox_city = input.postbox_city.clone();
    address.email = input.email.clone();
    address.phone = input.phone.clone();
    address.phone_mobile = input.phone_mobile.clone();
}
