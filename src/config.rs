use crate::error::{OrderError, Result};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct OrderCoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub default_locale: String,
    pub event_channel_capacity: usize,
    pub custom_settings: HashMap<String, String>,
}

impl Default for OrderCoreConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/order_core_development".to_string(),
            max_connections: 10,
            default_locale: "en".to_string(),
            event_channel_capacity: 1000,
            custom_settings: HashMap::new(),
        }
    }
}

impl OrderCoreConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            config.database_url = db_url;
        }

        if let Ok(max_connections) = std::env::var("ORDER_CORE_MAX_CONNECTIONS") {
            config.max_connections = max_connections.parse().map_err(|e| {
                OrderError::Configuration(format!("Invalid max_connections: {e}"))
            })?;
        }

        if let Ok(locale) = std::env::var("ORDER_CORE_DEFAULT_LOCALE") {
            config.default_locale = locale;
        }

        if let Ok(capacity) = std::env::var("ORDER_CORE_EVENT_CAPACITY") {
            config.event_channel_capacity = capacity.parse().map_err(|e| {
                OrderError::Configuration(format!("Invalid event_channel_capacity: {e}"))
            })?;
        }

        Ok(config)
    }
}
