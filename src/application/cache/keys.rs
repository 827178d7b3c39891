//! 缓存 key 规则
//!
//! key 格式: `{namespace}{kind}_{identifier}`，默认命名空间 `aura_ai_`，
//! 与前端本地存储中已有的条目保持兼容

/// 默认命名空间
pub const DEFAULT_NAMESPACE: &str = "aura_ai_";

/// 上传图片参与散列的前缀长度（UTF-16 单元）
pub const IMAGE_KEY_PREFIX_LEN: usize = 200;

/// 缓存条目类别，不同类别的 key 互不冲突
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Insight,
    Lens,
    Analysis,
}

impl CacheKind {
    pub const ALL: [CacheKind; 3] = [CacheKind::Insight, CacheKind::Lens, CacheKind::Analysis];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Insight => "insight",
            CacheKind::Lens => "lens",
            CacheKind::Analysis => "analysis",
        }
    }
}

impl std::fmt::Display for CacheKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生成缓存 key
pub fn cache_key(namespace: &str, kind: CacheKind, identifier: &str) -> String {
    format!("{}{}_{}", namespace, kind.as_str(), identifier)
}

/// 去掉 `data:<mime>;base64,` 头部
pub fn strip_data_url_header(image_data: &str) -> &str {
    if image_data.starts_with("data:") {
        if let Some(idx) = image_data.find(',') {
            return &image_data[idx + 1..];
        }
    }
    image_data
}

/// 32 位滚动散列：`h = h * 31 + c`，按 i32 回绕
fn rolling_hash(units: impl Iterator<Item = u16>) -> i32 {
    units.fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// 上传图片的缓存标识
///
/// 图片还没有内容 ID，用编码后载荷前 200 个字符的散列代替，保持 key 长度有界
pub fn image_cache_id(image_data: &str) -> String {
    let payload = strip_data_url_header(image_data);
    let hash = rolling_hash(payload.encode_utf16().take(IMAGE_KEY_PREFIX_LEN));
    to_base36(i64::from(hash).unsigned_abs())
}
