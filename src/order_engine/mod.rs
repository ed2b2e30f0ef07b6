//! The order engine: cart, checkout, order lifecycle, reviews.
//!
//! [`OrderEngine`] is the single writer for all of this state. Each mutating
//! request stages its changes in a [`UnitOfWork`] and commits them to the
//! [`OrderStore`] in one step, so a request either takes full effect or none.

pub mod error;
pub mod pricing;
pub mod reports;
pub mod service;
pub mod store;

pub use error::*;
pub use pricing::*;
pub use reports::*;
pub use service::*;
pub use store::*;
