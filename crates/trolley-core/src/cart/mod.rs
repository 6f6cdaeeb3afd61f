//! Cart domain models and repository traits.
//!
//! The cart is an ordered list of product lines owned by a single store;
//! persisted copies are a derived, non-authoritative mirror.

mod model;
mod repository;

pub use model::{Cart, CartItem, NewCartItem};
pub use repository::CartRepository;
