//! Query Handlers 实现

mod ai_handlers;
mod wallpaper_handlers;

pub use ai_handlers::*;
pub use wallpaper_handlers::*;
