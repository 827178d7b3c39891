//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod analyzer;
mod clock;
mod local_store;
mod persist_queue;
mod repositories;

pub use analyzer::{AnalyzerError, AnalyzerPort};
pub use clock::{Clock, ManualClock, SystemClock};
pub use local_store::{LocalStoreError, LocalStorePort};
pub use persist_queue::{PersistJob, PersistQueuePort};
pub use repositories::{RepositoryError, WallpaperRepositoryPort};
