//! # Field Descriptor Registry
//!
//! Column descriptors for the generic order list view: each descriptor
//! names the storage path (possibly an SQL expression over joined tables),
//! the joins it needs and a translation label key. Descriptors are built
//! per locale because the status name joins a locale-filtered translation
//! row; the last-built locale is cached and served until a different locale
//! is requested.

use std::sync::Arc;

use parking_lot::RwLock;

/// A join required by a descriptor's storage path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub entity: &'static str,
    pub alias: &'static str,
    pub on: String,
}

/// One column of the order list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub translation_key: &'static str,
    pub storage_path: String,
    pub joins: Vec<JoinSpec>,
    pub sortable: bool,
    pub default_visible: bool,
}

#[derive(Debug)]
struct CachedDescriptors {
    locale: String,
    descriptors: Arc<Vec<FieldDescriptor>>,
}

/// Lazily built, locale-keyed descriptor set.
#[derive(Debug, Default)]
pub struct FieldDescriptorRegistry {
    cache: RwLock<Option<CachedDescriptors>>,
}

impl FieldDescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered descriptors for the given locale. Served from cache while
    /// the locale matches the last build.
    pub fn descriptors(&self, locale: &str) -> Arc<Vec<FieldDescriptor>> {
        if let Some(cached) = self.cache.read().as_ref() {
            if cached.locale == locale {
                return Arc::clone(&cached.descriptors);
            }
        }

        let descriptors = Arc::new(build_descriptors(locale));
        *self.cache.write() = Some(CachedDescriptors {
            locale: locale.to_string(),
            descriptors: Arc::clone(&descriptors),
        });
        descriptors
    }

    pub fn find(&self, locale: &str, name: &str) -> Option<FieldDescriptor> {
        self.descriptors(locale)
            .iter()
            .find(|descriptor| descriptor.name == name)
            .cloned()
    }
}

fn invoice_address_join() -> JoinSpec {
    JoinSpec {
        entity: "order_addresses",
        alias: "invoice_address",
        on: "invoice_address.order_id = orders.order_id \
             AND invoice_address.address_type = 'invoice'"
            .to_string(),
    }
}

fn build_descriptors(locale: &str) -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor {
            name: "id",
            translation_key: "public.id",
            storage_path: "orders.order_id".to_string(),
            joins: Vec::new(),
            sortable: true,
            default_visible: false,
        },
        FieldDescriptor {
            name: "number",
            translation_key: "salesorder.orders.number",
            storage_path: "orders.order_number".to_string(),
            joins: Vec::new(),
            sortable: true,
            default_visible: true,
        },
        FieldDescriptor {
            name: "account",
            translation_key: "salesorder.orders.account",
            storage_path: "invoice_address.account_name".to_string(),
            joins: vec![invoice_address_join()],
            sortable: true,
            default_visible: true,
        },
        FieldDescriptor {
            name: "contact",
            translation_key: "salesorder.orders.contact",
            storage_path: "CONCAT(invoice_address.first_name, ' ', invoice_address.last_name)"
                .to_string(),
            joins: vec![invoice_address_join()],
            sortable: true,
            default_visible: true,
        },
        FieldDescriptor {
            name: "status",
            translation_key: "salesorder.orders.status",
            storage_path: "status_translation.value".to_string(),
            joins: vec![
                JoinSpec {
                    entity: "order_statuses",
                    alias: "status",
                    on: "status.status_id = orders.status_id".to_string(),
                },
                JoinSpec {
                    entity: "order_status_translations",
                    alias: "status_translation",
                    on: format!(
                        "status_translation.status_id = status.status_id \
                         AND status_translation.locale = '{locale}'"
                    ),
                },
            ],
            sortable: true,
            default_visible: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_order_and_content() {
        let registry = FieldDescriptorRegistry::new();
        let descriptors = registry.descriptors("en");
        let names: Vec<&str> = descriptors.iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["id", "number", "account", "contact", "status"]);

        let status = registry.find("en", "status").unwrap();
        assert_eq!(status.joins.len(), 2);
        assert!(status.joins[1].on.contains("locale = 'en'"));
    }

    #[test]
    fn test_same_locale_is_served_from_cache() {
        let registry = FieldDescriptorRegistry::new();
        let first = registry.descriptors("en");
        let second = registry.descriptors("en");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_locale_change_rebuilds() {
        let registry = FieldDescriptorRegistry::new();
        let en = registry.descriptors("en");
        let de = registry.descriptors("de");
        assert!(!Arc::ptr_eq(&en, &de));
        assert!(de[4].joins[1].on.contains("locale = 'de'"));

        // switching back rebuilds again (only the last locale is cached)
        let en_again = registry.descriptors("en");
        assert!(!Arc::ptr_eq(&en, &en_again));
    }
}
