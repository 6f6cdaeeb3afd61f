pub mod file_key_value_store;
pub mod json_cart_repository;
pub mod memory_key_value_store;
pub mod paths;

pub use crate::file_key_value_store::FileKeyValueStore;
pub use crate::json_cart_repository::JsonCartRepository;
pub use crate::memory_key_value_store::MemoryKeyValueStore;
