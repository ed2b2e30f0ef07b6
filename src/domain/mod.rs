//! Marketplace domain types. Pure data, no actor concerns.

pub mod ids;
pub mod money;
pub mod user;
pub mod restaurant;
pub mod menu_item;
pub mod cart;
pub mod order;
pub mod review;

pub use ids::*;
pub use money::*;
pub use user::*;
pub use restaurant::*;
pub use menu_item::*;
pub use cart::*;
pub use order::*;
pub use review::*;
