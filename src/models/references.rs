//! # Reference Entities
//!
//! External read-only entities the order domain references by id: accounts,
//! contacts, terms of delivery/payment and users. They are owned by other
//! bundles; this crate only looks them up and denormalizes a few values
//! (customer name, terms content) onto the order.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub account_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub contact_id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TermsOfDelivery {
    pub terms_id: i32,
    pub terms: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TermsOfPayment {
    pub terms_id: i32,
    pub terms: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_full_name() {
        let contact = Contact {
            contact_id: 1,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
        };
        assert_eq!(contact.full_name(), "Jane Doe");
    }
}
