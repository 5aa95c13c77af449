//! Session cart: line items, quantity handling and persistence
//!
//! The store holds the authoritative in-memory line items for the
//! active session and writes a whole-cart snapshot to the key-value
//! collaborator after every mutation.

pub mod storage;
pub mod store;

pub use storage::{KeyValueStore, MemoryStore, RedbStore, StorageError};
pub use store::{CartError, CartStore, CART_STORAGE_KEY};
