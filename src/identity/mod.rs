//! Identity provider: registration and credential checks.

pub mod error;
mod password;
pub mod service;

pub use error::*;
pub use service::*;
