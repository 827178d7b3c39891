//! Wallpaper Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 默认的外部来源 ID 前缀（Pexels / Wallhaven）
pub const DEFAULT_EXTERNAL_PREFIXES: &[&str] = &["pexels-", "wallhaven-"];

/// 壁纸唯一标识
///
/// 用户上传的壁纸使用 UUID；外部来源的壁纸带有提供方前缀，例如 `pexels-123456`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Result<Self, &'static str> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("壁纸 ID 不能为空");
        }
        Ok(Self(id))
    }

    /// 为新上传的壁纸生成 ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否为外部来源内容（没有可写的持久化记录）
    pub fn is_external<S: AsRef<str>>(&self, prefixes: &[S]) -> bool {
        prefixes
            .iter()
            .map(AsRef::as_ref)
            .any(|prefix| !prefix.is_empty() && self.0.starts_with(prefix))
    }
}

impl TryFrom<String> for ContentId {
    type Error = &'static str;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 调色板中的一个颜色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSwatch {
    pub name: String,
    pub hex: String,
}

impl ColorSwatch {
    pub fn new(name: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hex: hex.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_id_rejects_blank() {
        assert!(ContentId::new("").is_err());
        assert!(ContentId::new("   ").is_err());
        assert!(ContentId::new("c1").is_ok());
    }

    #[test]
    fn test_external_prefix_detection() {
        let pexels = ContentId::new("pexels-1181244").unwrap();
        let wallhaven = ContentId::new("wallhaven-9mjoy1").unwrap();
        let upload = ContentId::new("c1").unwrap();

        assert!(pexels.is_external(DEFAULT_EXTERNAL_PREFIXES));
        assert!(wallhaven.is_external(DEFAULT_EXTERNAL_PREFIXES));
        assert!(!upload.is_external(DEFAULT_EXTERNAL_PREFIXES));
    }

    #[test]
    fn test_empty_prefix_never_matches() {
        let id = ContentId::new("c1").unwrap();
        assert!(!id.is_external(&[""]));
    }

    #[test]
    fn test_deserialize_rejects_blank_id() {
        assert!(serde_json::from_str::<ContentId>(r#""""#).is_err());
        assert!(serde_json::from_str::<ContentId>(r#""   ""#).is_err());

        let id: ContentId = serde_json::from_str(r#""c1""#).unwrap();
        assert_eq!(id.as_str(), "c1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""c1""#);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ContentId::generate(), ContentId::generate());
    }
}
