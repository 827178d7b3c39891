//! SQLite Wallpaper Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{RepositoryError, WallpaperRepositoryPort};
use crate::domain::wallpaper::{AnnotationUpdate, ContentId, Wallpaper};

/// SQLite Wallpaper Repository
pub struct SqliteWallpaperRepository {
    pool: DbPool,
}

impl SqliteWallpaperRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct WallpaperRow {
    id: String,
    title: String,
    tags: String,
    image_url: String,
    ai_insight: Option<String>,
    ai_description: Option<String>,
    ai_colors: Option<String>,
    ai_objects: Option<String>,
    ai_style: Option<String>,
    ai_search_terms: Option<String>,
    created_at: String,
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn encode_optional<T: Serialize>(value: &Option<T>) -> Result<Option<String>, RepositoryError> {
    value.as_ref().map(encode_json).transpose()
}

fn decode_optional<T: DeserializeOwned>(
    value: Option<String>,
) -> Result<Option<T>, RepositoryError> {
    value
        .map(|raw| {
            serde_json::from_str(&raw)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))
        })
        .transpose()
}

impl TryFrom<WallpaperRow> for Wallpaper {
    type Error = RepositoryError;

    fn try_from(row: WallpaperRow) -> Result<Self, Self::Error> {
        Ok(Wallpaper {
            id: ContentId::new(row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            title: row.title,
            tags: serde_json::from_str(&row.tags)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            image_url: row.image_url,
            created_at: Some(
                DateTime::parse_from_rfc3339(&row.created_at)
                    .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                    .with_timezone(&Utc),
            ),
            ai_insight: row.ai_insight,
            ai_description: row.ai_description,
            ai_colors: decode_optional(row.ai_colors)?,
            ai_objects: decode_optional(row.ai_objects)?,
            ai_style: row.ai_style,
            ai_search_terms: decode_optional(row.ai_search_terms)?,
        })
    }
}

#[async_trait]
impl WallpaperRepositoryPort for SqliteWallpaperRepository {
    async fn save(&self, wallpaper: &Wallpaper) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let created_at = wallpaper.created_at.unwrap_or(now);

        sqlx::query(
            r#"
            INSERT INTO wallpapers (id, title, tags, image_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                tags = excluded.tags,
                image_url = excluded.image_url,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(wallpaper.id.as_str())
        .bind(&wallpaper.title)
        .bind(encode_json(&wallpaper.tags)?)
        .bind(&wallpaper.image_url)
        .bind(created_at.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Wallpaper>, RepositoryError> {
        let row: Option<WallpaperRow> = sqlx::query_as(
            r#"
            SELECT id, title, tags, image_url,
                   ai_insight, ai_description, ai_colors, ai_objects, ai_style, ai_search_terms,
                   created_at
            FROM wallpapers WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(Wallpaper::try_from).transpose()
    }

    async fn update_annotations(
        &self,
        id: &ContentId,
        update: &AnnotationUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE wallpapers SET
                ai_insight = COALESCE(?, ai_insight),
                ai_description = COALESCE(?, ai_description),
                ai_colors = COALESCE(?, ai_colors),
                ai_objects = COALESCE(?, ai_objects),
                ai_style = COALESCE(?, ai_style),
                ai_search_terms = COALESCE(?, ai_search_terms),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.ai_insight)
        .bind(&update.ai_description)
        .bind(encode_optional(&update.ai_colors)?)
        .bind(encode_optional(&update.ai_objects)?)
        .bind(&update.ai_style)
        .bind(encode_optional(&update.ai_search_terms)?)
        .bind(Utc::now().to_rfc3339())
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        tracing::debug!(content_id = %id, "Wallpaper annotations updated");
        Ok(())
    }
}
