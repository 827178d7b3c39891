//! Wallpaper Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::SaveWallpaper;
use crate::application::error::ApplicationError;
use crate::application::ports::WallpaperRepositoryPort;
use crate::domain::wallpaper::{ContentId, Wallpaper};

/// SaveWallpaper Handler
pub struct SaveWallpaperHandler {
    wallpaper_repo: Arc<dyn WallpaperRepositoryPort>,
}

impl SaveWallpaperHandler {
    pub fn new(wallpaper_repo: Arc<dyn WallpaperRepositoryPort>) -> Self {
        Self { wallpaper_repo }
    }

    pub async fn handle(&self, command: SaveWallpaper) -> Result<Wallpaper, ApplicationError> {
        let id = match command.id {
            Some(id) => ContentId::new(id).map_err(ApplicationError::validation)?,
            None => ContentId::generate(),
        };

        if command.title.trim().is_empty() {
            return Err(ApplicationError::validation("Title cannot be empty"));
        }
        if command.image_url.trim().is_empty() {
            return Err(ApplicationError::validation("Image URL cannot be empty"));
        }

        let mut wallpaper =
            Wallpaper::new(id, command.title, command.image_url).with_tags(command.tags);
        wallpaper.created_at = Some(Utc::now());

        self.wallpaper_repo.save(&wallpaper).await?;

        tracing::info!(
            content_id = %wallpaper.id,
            title = %wallpaper.title,
            "Wallpaper saved"
        );

        // 返回持久化后的记录（已存在时带着之前写入的标注）
        let saved = self
            .wallpaper_repo
            .find_by_id(&wallpaper.id)
            .await?
            .unwrap_or(wallpaper);
        Ok(saved)
    }
}
