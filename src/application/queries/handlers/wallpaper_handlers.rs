//! Wallpaper Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::WallpaperRepositoryPort;
use crate::application::queries::GetWallpaper;
use crate::domain::wallpaper::{ContentId, Wallpaper};

/// GetWallpaper Handler
pub struct GetWallpaperHandler {
    wallpaper_repo: Arc<dyn WallpaperRepositoryPort>,
}

impl GetWallpaperHandler {
    pub fn new(wallpaper_repo: Arc<dyn WallpaperRepositoryPort>) -> Self {
        Self { wallpaper_repo }
    }

    pub async fn handle(&self, query: GetWallpaper) -> Result<Wallpaper, ApplicationError> {
        let id = ContentId::new(query.id).map_err(ApplicationError::validation)?;

        self.wallpaper_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Wallpaper", id.as_str()))
    }
}
