//! Order engine for a food-ordering marketplace.
//!
//! Customers build carts from restaurant menus and check out into one order
//! per restaurant; owners move orders through their lifecycle; customers
//! review delivered orders. Every component is a tokio actor reached through
//! a cloneable client:
//!
//! - [`identity`]: user accounts and credential checks
//! - catalog ([`actor_framework`] + [`catalog`]): restaurants and menu items
//! - [`order_engine`]: carts, orders, reviews and favourites
//!
//! [`app_system::MarketplaceSystem`] starts and wires them together.

pub mod actor_framework;
pub mod api;
pub mod app_system;
pub mod catalog;
pub mod clients;
pub mod domain;
pub mod identity;
pub mod messages;
pub mod order_engine;

#[cfg(test)]
mod mock_framework;
