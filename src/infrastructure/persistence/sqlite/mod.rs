//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod wallpaper_repo;

pub use database::*;
pub use wallpaper_repo::*;
