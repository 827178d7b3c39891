//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod ai_queries;
mod wallpaper_queries;

pub mod handlers;

pub use ai_queries::*;
pub use wallpaper_queries::*;
