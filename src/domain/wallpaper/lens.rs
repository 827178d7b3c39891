//! Lens 分析结果
//!
//! 结构化的壁纸视觉分析：描述、调色板、识别到的元素、风格、搜索词

use serde::{Deserialize, Serialize};

use super::value_objects::ColorSwatch;

/// 持久化记录缺少风格时使用的默认风格
pub const DEFAULT_LENS_STYLE: &str = "Digital Art";

/// Lens 分析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LensResult {
    pub description: String,
    /// 调色板，顺序即重要性
    pub colors: Vec<ColorSwatch>,
    pub objects: Vec<String>,
    pub style: String,
    pub search_terms: Vec<String>,
}

impl LensResult {
    /// 判断一组持久化字段是否构成完整的 Lens 标注
    ///
    /// 描述非空且调色板非空才算已标注；空调色板的记录视为未标注
    pub fn is_present(description: Option<&str>, colors: Option<&[ColorSwatch]>) -> bool {
        let has_description = description.is_some_and(|d| !d.is_empty());
        let has_colors = colors.is_some_and(|c| !c.is_empty());
        has_description && has_colors
    }

    /// 从四个独立的可选字段重建 Lens 结果
    ///
    /// 缺失的子字段使用默认值：objects / search_terms 为空，style 为 [`DEFAULT_LENS_STYLE`]。
    /// 不满足 [`LensResult::is_present`] 时返回 None。
    pub fn reconstruct(
        description: Option<&str>,
        colors: Option<&[ColorSwatch]>,
        objects: Option<&[String]>,
        style: Option<&str>,
        search_terms: Option<&[String]>,
    ) -> Option<Self> {
        if !Self::is_present(description, colors) {
            return None;
        }

        Some(Self {
            description: description.unwrap_or_default().to_string(),
            colors: colors.unwrap_or_default().to_vec(),
            objects: objects.map(<[String]>::to_vec).unwrap_or_default(),
            style: style
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_LENS_STYLE)
                .to_string(),
            search_terms: search_terms.map(<[String]>::to_vec).unwrap_or_default(),
        })
    }
}
