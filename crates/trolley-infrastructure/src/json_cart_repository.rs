//! Cart repository implementation.
//!
//! Mirrors the whole cart as one JSON array of entries under a fixed
//! namespaced key in a key-value store, last write wins.
//!
//! Storage key: `@trolley:cart`

use async_trait::async_trait;

use trolley_core::cart::{Cart, CartRepository};
use trolley_core::error::Result;
use trolley_core::storage::KeyValueStore;

/// Key-value backed cart repository.
///
/// The persisted value is a bare JSON array of entries with fields `id`,
/// `title`, `image_url`, `price` and `quantity`. No version field, no
/// schema migration.
pub struct JsonCartRepository<S> {
    store: S,
}

impl<S> JsonCartRepository<S> {
    /// Fixed namespaced key the cart list is stored under.
    pub const STORAGE_KEY: &'static str = "@trolley:cart";

    /// Creates a repository over the given key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: KeyValueStore> CartRepository for JsonCartRepository<S> {
    async fn load(&self) -> Result<Option<Cart>> {
        let Some(text) = self.store.get(Self::STORAGE_KEY).await? else {
            return Ok(None);
        };

        let cart: Cart = serde_json::from_str(&text)?;
        Ok(Some(cart))
    }

    async fn save(&self, cart: &Cart) -> Result<()> {
        let text = serde_json::to_string(cart)?;
        self.store.set(Self::STORAGE_KEY, &text).await?;

        tracing::debug!(entries = cart.len(), "persisted cart list");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_key_value_store::MemoryKeyValueStore;
    use trolley_core::cart::NewCartItem;

    fn product(id: &str) -> NewCartItem {
        NewCartItem {
            id: id.to_string(),
            title: format!("Product {}", id),
            image_url: format!("https://cdn.example.com/{}.png", id),
            price: 12.5,
        }
    }

    #[tokio::test]
    async fn test_load_none_when_nothing_persisted() {
        let repo = JsonCartRepository::new(MemoryKeyValueStore::new());

        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let repo = JsonCartRepository::new(MemoryKeyValueStore::new());

        let cart = Cart::new().add(product("a")).add(product("b")).increment("a");
        repo.save(&cart).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, cart);
        assert_eq!(loaded.get("a").unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_save_replaces_previous_copy() {
        let repo = JsonCartRepository::new(MemoryKeyValueStore::new());

        repo.save(&Cart::new().add(product("a"))).await.unwrap();
        let emptied = Cart::new();
        repo.save(&emptied).await.unwrap();

        assert_eq!(repo.load().await.unwrap().unwrap(), emptied);
    }

    #[tokio::test]
    async fn test_malformed_text_surfaces_serialization_error() {
        let store = MemoryKeyValueStore::new();
        store
            .set(JsonCartRepository::<MemoryKeyValueStore>::STORAGE_KEY, "{not json")
            .await
            .unwrap();
        let repo = JsonCartRepository::new(store);

        let err = repo.load().await.unwrap_err();
        assert!(err.is_serialization());
    }
}
