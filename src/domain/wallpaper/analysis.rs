//! 上传时的图片分析结果

use serde::{Deserialize, Serialize};

use super::value_objects::ColorSwatch;

/// 图片分析结果
///
/// 发布前对用户选择的图片做分析，用于预填标题、标签和分类
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub suggested_title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub colors: Vec<ColorSwatch>,
}
