//! Persistence Layer - 数据持久化
//!
//! SQLite（壁纸记录）和 Sled（AI 结果本地缓存）存储实现

pub mod sled;
pub mod sqlite;

pub use self::sled::SledLocalStore;
pub use self::sqlite::SqliteWallpaperRepository;
