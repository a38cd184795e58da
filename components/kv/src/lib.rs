pub mod err;
pub mod file;
pub mod memory;
#[cfg(feature = "kv-rocksdb")]
pub mod rocks;
pub mod store;

pub use err::{Error, Result};
pub use store::{open_store, Store, StoreRef};
