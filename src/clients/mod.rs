//! Cloneable handles for talking to the marketplace actors.

#[macro_use]
mod macros;

pub mod identity_client;
pub mod menu_client;
pub mod order_client;
pub mod restaurant_client;

pub use identity_client::*;
pub use menu_client::*;
pub use order_client::*;
pub use restaurant_client::*;
