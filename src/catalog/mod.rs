//! Catalog entities (restaurants and menu items) served by `ResourceActor`s.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
