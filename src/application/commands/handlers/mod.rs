//! Command Handlers 实现

mod wallpaper_handlers;

pub use wallpaper_handlers::*;
