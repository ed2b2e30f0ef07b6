use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("Catalog validation error: {0}")]
    ValidationError(String),
    #[error("Not authorized: {0}")]
    AuthorizationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CatalogError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound { kind, id } => CatalogError::NotFound { kind, id },
            FrameworkError::Rejected(msg) => CatalogError::ValidationError(msg),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                CatalogError::ActorCommunicationError(err.to_string())
            }
        }
    }
}
