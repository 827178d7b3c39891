//! Wallpaper Commands

/// 保存壁纸命令
///
/// 未提供 ID 时生成新的 UUID；标注字段由 AI 缓存服务写入，这里不接收
#[derive(Debug, Clone)]
pub struct SaveWallpaper {
    pub id: Option<String>,
    pub title: String,
    pub tags: Vec<String>,
    pub image_url: String,
}
