//! # Save Payload Schema
//!
//! Typed boundary schema for the order save payload. The wire format keeps
//! the original camelCase field names; every field is optional so that an
//! absent key leaves the corresponding order value untouched. Validation of
//! required fields happens in the save workflow, where creation and update
//! differ.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{OrderError, Result};

/// A date field that arrives either pre-parsed or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateTimeInput {
    Parsed(NaiveDateTime),
    Raw(String),
}

impl DateTimeInput {
    /// Resolve to a concrete timestamp. Accepted string formats: RFC 3339,
    /// `%Y-%m-%d %H:%M:%S` and `%Y-%m-%d` (midnight).
    pub fn resolve(&self, field: &str) -> Result<NaiveDateTime> {
        match self {
            DateTimeInput::Parsed(value) => Ok(*value),
            DateTimeInput::Raw(raw) => parse_datetime(field, raw),
        }
    }
}

fn parse_datetime(field: &str, raw: &str) -> Result<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.naive_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(parsed);
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = parsed.and_hms_opt(0, 0, 0) {
            return Ok(midnight);
        }
    }
    Err(OrderError::invalid_attribute(
        field,
        format!("unparseable date '{raw}'"),
    ))
}

/// A reference to an external entity, carrying only its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceInput {
    pub id: i32,
}

/// Address fields as submitted for the invoice or delivery address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub account_name: Option<String>,
    pub title: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub addition: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postbox_number: Option<String>,
    pub postbox_postcode: Option<String>,
    pub postbox_city: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_mobile: Option<String>,
}

/// A submitted line item. Records without an id are created; records whose
/// id matches a current item update it in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemInput {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub item_number: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub discount_percent: Option<f64>,
    pub tax_rate: Option<f64>,
}

/// The save payload. Absent keys leave existing order values untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveOrderInput {
    pub order_number: Option<String>,
    pub currency: Option<String>,
    pub cost_centre: Option<String>,
    pub commission: Option<String>,
    pub taxfree: Option<bool>,
    pub desired_delivery_date: Option<DateTimeInput>,
    pub order_date: Option<DateTimeInput>,
    pub terms_of_delivery: Option<ReferenceInput>,
    pub terms_of_delivery_content: Option<String>,
    pub terms_of_payment: Option<ReferenceInput>,
    pub terms_of_payment_content: Option<String>,
    pub account: Option<ReferenceInput>,
    pub contact: Option<ReferenceInput>,
    pub responsible_contact: Option<ReferenceInput>,
    pub invoice_address: Option<AddressInput>,
    pub delivery_address: Option<AddressInput>,
    pub items: Option<Vec<ItemInput>>,
}

impl SaveOrderInput {
    /// Required-field check for the two address blocks. Creation demands
    /// both; updates keep the same requirement because addresses are fully
    /// repopulated on every save.
    pub fn require_addresses(&self) -> Result<(&AddressInput, &AddressInput)> {
        let invoice = self
            .invoice_address
            .as_ref()
            .ok_or_else(|| OrderError::missing_attribute("invoiceAddress"))?;
        let delivery = self
            .delivery_address
            .as_ref()
            .ok_or_else(|| OrderError::missing_attribute("deliveryAddress"))?;
        Ok((invoice, delivery))
    }
}
