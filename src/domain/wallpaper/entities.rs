//! Wallpaper Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lens::LensResult;
use super::value_objects::{ColorSwatch, ContentId};

/// 壁纸内容记录
///
/// `ai_*` 字段由 AI 缓存服务在首次读取时惰性写入，创建时为空，之后不再失效
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallpaper {
    pub id: ContentId,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_colors: Option<Vec<ColorSwatch>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_objects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_search_terms: Option<Vec<String>>,
}

impl Wallpaper {
    /// 创建一条尚未标注的壁纸
    pub fn new(id: ContentId, title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            tags: Vec::new(),
            image_url: image_url.into(),
            created_at: None,
            ai_insight: None,
            ai_description: None,
            ai_colors: None,
            ai_objects: None,
            ai_style: None,
            ai_search_terms: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// 已物化的 insight（空字符串视为不存在）
    pub fn materialized_insight(&self) -> Option<&str> {
        self.ai_insight.as_deref().filter(|s| !s.is_empty())
    }

    /// 已物化的 Lens 结果
    pub fn materialized_lens(&self) -> Option<LensResult> {
        LensResult::reconstruct(
            self.ai_description.as_deref(),
            self.ai_colors.as_deref(),
            self.ai_objects.as_deref(),
            self.ai_style.as_deref(),
            self.ai_search_terms.as_deref(),
        )
    }

    /// 合并一次部分更新（盲写，只覆盖更新中出现的字段）
    pub fn apply(&mut self, update: &AnnotationUpdate) {
        if let Some(v) = &update.ai_insight {
            self.ai_insight = Some(v.clone());
        }
        if let Some(v) = &update.ai_description {
            self.ai_description = Some(v.clone());
        }
        if let Some(v) = &update.ai_colors {
            self.ai_colors = Some(v.clone());
        }
        if let Some(v) = &update.ai_objects {
            self.ai_objects = Some(v.clone());
        }
        if let Some(v) = &update.ai_style {
            self.ai_style = Some(v.clone());
        }
        if let Some(v) = &update.ai_search_terms {
            self.ai_search_terms = Some(v.clone());
        }
    }
}

/// 标注字段的部分更新
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_colors: Option<Vec<ColorSwatch>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_objects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_search_terms: Option<Vec<String>>,
}

impl AnnotationUpdate {
    pub fn insight(insight: impl Into<String>) -> Self {
        Self {
            ai_insight: Some(insight.into()),
            ..Default::default()
        }
    }

    /// Lens 结果的五个字段作为一次更新写回
    pub fn lens(lens: &LensResult) -> Self {
        Self {
            ai_description: Some(lens.description.clone()),
            ai_colors: Some(lens.colors.clone()),
            ai_objects: Some(lens.objects.clone()),
            ai_style: Some(lens.style.clone()),
            ai_search_terms: Some(lens.search_terms.clone()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
