//! Sled Persistence - 本地键值存储

mod local_store;

pub use local_store::{SledLocalStore, SledStoreConfig};
