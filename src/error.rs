use thiserror::Error;

/// Errors surfaced by the order-management core.
///
/// All variants are raised synchronously and propagate uncaught to the
/// caller; nothing is retried internally. A failure between registering
/// entities with the unit of work and flushing leaves the unit of work
/// as-is, so callers decide whether to discard or flush.
#[derive(Debug, Error)]
pub enum OrderError {
    /// An order or status lookup missed.
    #[error("{entity} not found with id {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// A referenced contact/account/terms id did not resolve.
    #[error("dependency {entity} not found with id {id}")]
    DependencyNotFound { entity: &'static str, id: i64 },

    /// A required field or sub-field is absent or null.
    #[error("missing attribute: {0}")]
    MissingAttribute(String),

    /// A field was present but malformed.
    #[error("invalid attribute {field}: {reason}")]
    InvalidAttribute { field: String, reason: String },

    /// Line-item reconciliation failed; carries the cause's message.
    #[error("error while processing order: {0}")]
    Processing(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl OrderError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        OrderError::NotFound { entity, id }
    }

    pub fn dependency_not_found(entity: &'static str, id: i64) -> Self {
        OrderError::DependencyNotFound { entity, id }
    }

    pub fn missing_attribute(field: impl Into<String>) -> Self {
        OrderError::MissingAttribute(field.into())
    }

    pub fn invalid_attribute(field: impl Into<String>, reason: impl Into<String>) -> Self {
        OrderError::InvalidAttribute {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrderError>;
