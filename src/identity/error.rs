use thiserror::Error;

/// Errors that can occur during identity operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IdentityError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
