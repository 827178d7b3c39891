//! Worker Layer - Background Task Processing
//!
//! 实现 PersistWorker，异步写回 AI 标注

mod persist_worker;

pub use persist_worker::{ChannelPersistQueue, PersistWorker, PersistWorkerConfig};
