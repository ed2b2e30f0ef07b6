use thiserror::Error;

use crate::catalog::CatalogError;
use crate::domain::{OrderId, OrderStatus};

/// Failures raised by the unit-of-work commit. Nothing is applied when one occurs.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Write conflict: {0}")]
    Conflict(String),
    #[error("Duplicate key in {table}: {key}")]
    DuplicateKey { table: &'static str, key: String },
}

/// Errors that can occur during order engine operations.
///
/// Every variant is recoverable: the caller reports it and carries on.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("Not authorized: {0}")]
    AuthorizationError(String),
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Order {0} already has a review")]
    DuplicateReview(OrderId),
    #[error("Order storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        OrderError::NotFound { kind, id: id.to_string() }
    }

    /// Stable machine-readable name, used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::ValidationError(_) => "validation",
            OrderError::NotFound { .. } => "not_found",
            OrderError::AuthorizationError(_) => "authorization",
            OrderError::EmptyCart => "empty_cart",
            OrderError::InvalidTransition { .. } => "invalid_transition",
            OrderError::DuplicateReview(_) => "duplicate_review",
            OrderError::StorageError(_) => "storage",
            OrderError::ActorCommunicationError(_) => "unavailable",
        }
    }
}

impl From<CatalogError> for OrderError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { kind, id } => OrderError::NotFound { kind, id },
            CatalogError::ValidationError(msg) => OrderError::ValidationError(msg),
            CatalogError::AuthorizationError(msg) => OrderError::AuthorizationError(msg),
            CatalogError::ActorCommunicationError(msg) => OrderError::ActorCommunicationError(msg),
        }
    }
}
