//! Repository Ports - 出站端口
//!
//! 定义壁纸记录持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::wallpaper::{AnnotationUpdate, ContentId, Wallpaper};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Wallpaper Repository Port
#[async_trait]
pub trait WallpaperRepositoryPort: Send + Sync {
    /// 保存壁纸（存在则覆盖基础字段，不触碰标注字段）
    async fn save(&self, wallpaper: &Wallpaper) -> Result<(), RepositoryError>;

    /// 根据 ID 查找壁纸
    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Wallpaper>, RepositoryError>;

    /// 部分更新标注字段
    ///
    /// 只覆盖 update 中出现的字段，无版本检查；记录不存在时返回 NotFound
    async fn update_annotations(
        &self,
        id: &ContentId,
        update: &AnnotationUpdate,
    ) -> Result<(), RepositoryError>;
}
