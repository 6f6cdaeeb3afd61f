//! Cart repository trait.

use async_trait::async_trait;

use super::model::Cart;
use crate::error::Result;

/// Repository trait for cart list persistence.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Loads the persisted cart list.
    ///
    /// Returns `None` if nothing has been persisted yet.
    async fn load(&self) -> Result<Option<Cart>>;

    /// Saves the cart list, replacing any previously persisted copy.
    async fn save(&self, cart: &Cart) -> Result<()>;
}
