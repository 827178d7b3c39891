//! Memory Layer - In-Memory State
//!
//! 内存本地存储实现，用于测试和无需跨重启保留缓存的部署

mod local_store;

pub use local_store::InMemoryLocalStore;
