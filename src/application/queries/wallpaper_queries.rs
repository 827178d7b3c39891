//! Wallpaper Queries

/// 获取壁纸详情查询
#[derive(Debug, Clone)]
pub struct GetWallpaper {
    pub id: String,
}
