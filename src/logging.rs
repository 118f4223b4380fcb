//! # Structured Logging Module
//!
//! Environment-aware structured logging for the order workflows. Console
//! output is human-readable; set `ORDER_CORE_LOG_JSON=1` for JSON lines.

use std::sync::OnceLock;

use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let json_output = std::env::var("ORDER_CORE_LOG_JSON").is_ok();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        let init_result = if json_output {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_ansi(false)
                        .json()
                        .with_filter(filter),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_ansi(true)
                        .with_filter(filter),
                )
                .try_init()
        };

        // A global subscriber may already be set by the embedding application
        if init_result.is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing");
        }

        tracing::info!(
            environment = %environment,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("ORDER_CORE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for order save operations
pub fn log_order_operation(
    operation: &str,
    order_id: Option<i64>,
    locale: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        order_id = order_id,
        locale = locale,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "ORDER_OPERATION"
    );
}

/// Log structured data for status transitions
pub fn log_status_transition(
    order_id: i64,
    from_status: Option<i32>,
    to_status: i32,
    bitmask: i64,
) {
    tracing::info!(
        order_id = order_id,
        from_status = from_status,
        to_status = to_status,
        bitmask = bitmask,
        timestamp = %Utc::now().to_rfc3339(),
        "STATUS_TRANSITION"
    );
}

/// Log structured data for database operations
pub fn log_database_operation(
    operation: &str,
    table: Option<&str>,
    record_id: Option<i64>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        table = table,
        record_id = record_id,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "DATABASE_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
