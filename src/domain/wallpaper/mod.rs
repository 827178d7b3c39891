//! Wallpaper Context - 壁纸与 AI 标注

mod analysis;
mod entities;
mod lens;
mod value_objects;

pub use analysis::ImageAnalysis;
pub use entities::{AnnotationUpdate, Wallpaper};
pub use lens::{LensResult, DEFAULT_LENS_STYLE};
pub use value_objects::{ColorSwatch, ContentId, DEFAULT_EXTERNAL_PREFIXES};
