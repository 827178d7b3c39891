//! Sled-based Local Store Implementation
//!
//! 进程重启后依然保留的本地键值存储，按 key + value 字节数计算容量

use sled::Db;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::ports::{LocalStoreError, LocalStorePort};

/// Sled 本地存储配置
#[derive(Debug, Clone)]
pub struct SledStoreConfig {
    /// 数据库路径
    pub db_path: String,
    /// 容量上限（字节），0 表示不限制
    pub quota_bytes: u64,
}

impl Default for SledStoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/ai_cache.sled".to_string(),
            quota_bytes: 5 * 1024 * 1024, // 5MB
        }
    }
}

/// Sled 本地存储
pub struct SledLocalStore {
    db: Db,
    quota_bytes: u64,
    current_size: AtomicU64,
}

impl SledLocalStore {
    /// 创建新的存储实例
    pub fn new(config: &SledStoreConfig) -> Result<Self, LocalStoreError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| LocalStoreError::DatabaseError(e.to_string()))?;

        // 计算当前占用
        let current_size = Self::calculate_total_size(&db)?;

        tracing::info!(
            db_path = %config.db_path,
            quota_bytes = config.quota_bytes,
            current_size = current_size,
            "SledLocalStore initialized"
        );

        Ok(Self {
            db,
            quota_bytes: config.quota_bytes,
            current_size: AtomicU64::new(current_size),
        })
    }

    /// 打开现有存储
    pub fn open<P: AsRef<Path>>(path: P, quota_bytes: u64) -> Result<Self, LocalStoreError> {
        let config = SledStoreConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
            quota_bytes,
        };
        Self::new(&config)
    }

    /// 计算数据库中所有条目的总大小
    fn calculate_total_size(db: &Db) -> Result<u64, LocalStoreError> {
        let mut total = 0u64;
        for item in db.iter() {
            let (key, value) = item.map_err(|e| LocalStoreError::DatabaseError(e.to_string()))?;
            total += (key.len() + value.len()) as u64;
        }
        Ok(total)
    }

    pub fn size_bytes(&self) -> u64 {
        self.current_size.load(Ordering::Relaxed)
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), LocalStoreError> {
        self.db
            .flush()
            .map_err(|e| LocalStoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

impl LocalStorePort for SledLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        match self.db.get(key) {
            Ok(Some(data)) => {
                let value = String::from_utf8(data.to_vec())
                    .map_err(|e| LocalStoreError::EncodingError(e.to_string()))?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(LocalStoreError::DatabaseError(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let new_size = (key.len() + value.len()) as u64;
        let old_size = self
            .db
            .get(key)
            .map_err(|e| LocalStoreError::DatabaseError(e.to_string()))?
            .map(|old| (key.len() + old.len()) as u64)
            .unwrap_or(0);

        let needed = self.size_bytes().saturating_sub(old_size) + new_size;
        if self.quota_bytes > 0 && needed > self.quota_bytes {
            return Err(LocalStoreError::QuotaExceeded {
                needed,
                quota: self.quota_bytes,
            });
        }

        let previous = self
            .db
            .insert(key, value.as_bytes())
            .map_err(|e| LocalStoreError::DatabaseError(e.to_string()))?;

        // 以实际被替换的旧值为准
        let replaced = previous
            .map(|old| (key.len() + old.len()) as u64)
            .unwrap_or(0);
        self.current_size.fetch_add(new_size, Ordering::Relaxed);
        self.current_size.fetch_sub(replaced, Ordering::Relaxed);

        tracing::trace!(key = %key, size_bytes = new_size, "Local store write");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        if let Some(old) = self
            .db
            .remove(key)
            .map_err(|e| LocalStoreError::DatabaseError(e.to_string()))?
        {
            self.current_size
                .fetch_sub((key.len() + old.len()) as u64, Ordering::Relaxed);
        }
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, LocalStoreError> {
        let mut keys = Vec::new();
        for item in self.db.scan_prefix(prefix) {
            let (key, _) = item.map_err(|e| LocalStoreError::DatabaseError(e.to_string()))?;
            let key = String::from_utf8(key.to_vec())
                .map_err(|e| LocalStoreError::EncodingError(e.to_string()))?;
            keys.push(key);
        }
        Ok(keys)
    }
}
