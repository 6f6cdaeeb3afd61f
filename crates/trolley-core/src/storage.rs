//! Key-value storage trait.
//!
//! The device-local storage the cart is mirrored to: string keys, serialized
//! text values, last write wins.

use async_trait::async_trait;

use crate::error::Result;

/// A persistent key-value store with string keys and text values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
