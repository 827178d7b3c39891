//! HTTP Handlers

mod ai;
mod ping;
mod wallpaper;

pub use ai::*;
pub use ping::*;
pub use wallpaper::*;
