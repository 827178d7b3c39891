//! Local Store Port - 本地键值存储
//!
//! 字符串键、字符串值的同步存储，有容量上限，写入超限时返回错误

use thiserror::Error;

/// 本地存储错误
#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("Local store quota exceeded: need {needed} bytes, quota {quota} bytes")]
    QuotaExceeded { needed: u64, quota: u64 },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// Local Store Port
///
/// 多个缓存实例可以共享同一个存储（不同命名空间），共享同一份容量
pub trait LocalStorePort: Send + Sync {
    /// 读取
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    /// 写入（覆盖已有值）
    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

    /// 删除，键不存在时不报错
    fn remove(&self, key: &str) -> Result<(), LocalStoreError>;

    /// 列出指定前缀下的所有键
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, LocalStoreError>;
}
