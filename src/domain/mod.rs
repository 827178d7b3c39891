//! Domain Layer - 领域层
//!
//! - Wallpaper Context: 壁纸记录与 AI 标注（insight / lens / 上传分析）
//! - Insight 生成器: 基于标题和标签的确定性模板

pub mod wallpaper;

mod insight;

pub use insight::{generate_insight, pick_mood, FALLBACK_MOOD};
