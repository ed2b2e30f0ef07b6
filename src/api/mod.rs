//! JSON boundary: request bodies in, engine commands out.
//!
//! Request structs accept loosely typed input (signed quantities, status
//! strings) and `validate()` turns them into the typed commands the
//! [`OrderClient`](crate::clients::OrderClient) takes, or a `ValidationError`.

mod requests;

pub use requests::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::order_engine::OrderError;

/// Parses a JSON request body. Malformed input is a `ValidationError`.
pub fn parse<T: DeserializeOwned>(body: &str) -> Result<T, OrderError> {
    serde_json::from_str(body).map_err(|e| OrderError::ValidationError(format!("malformed request: {e}")))
}

/// JSON rendering of a failed operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl From<&OrderError> for ErrorBody {
    fn from(error: &OrderError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}
