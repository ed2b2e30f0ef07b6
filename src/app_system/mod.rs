//! System orchestration: configuration, tracing setup, startup and shutdown.

pub mod config;
pub mod system;
pub mod tracing;

pub use config::*;
pub use system::*;
pub use self::tracing::*;
