//! In-Memory Local Store Implementation

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::application::ports::{LocalStoreError, LocalStorePort};

/// 条目占用的字节数（key + value）
#[inline]
fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

/// 内存本地存储
///
/// 按 key + value 字节数计算容量，`quota_bytes` 为 0 表示不限制
pub struct InMemoryLocalStore {
    entries: DashMap<String, String>,
    quota_bytes: u64,
    current_size: AtomicU64,
}

impl InMemoryLocalStore {
    pub fn new(quota_bytes: u64) -> Self {
        Self {
            entries: DashMap::new(),
            quota_bytes,
            current_size: AtomicU64::new(0),
        }
    }

    /// 不限容量
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn size_bytes(&self) -> u64 {
        self.current_size.load(Ordering::Acquire)
    }
}

impl Default for InMemoryLocalStore {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl LocalStorePort for InMemoryLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let new_size = entry_size(key, value);

        // 持有分片写锁直到写入完成，旧值大小与实际被替换的一致
        let entry = self.entries.entry(key.to_string());
        let old_size = match &entry {
            Entry::Occupied(occupied) => entry_size(key, occupied.get()),
            Entry::Vacant(_) => 0,
        };

        // 容量检查与计数更新是同一个原子操作，并发写入共享同一份配额
        let quota = self.quota_bytes;
        self.current_size
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                let needed = current.saturating_sub(old_size) + new_size;
                (quota == 0 || needed <= quota).then_some(needed)
            })
            .map_err(|current| LocalStoreError::QuotaExceeded {
                needed: current.saturating_sub(old_size) + new_size,
                quota,
            })?;

        match entry {
            Entry::Occupied(mut occupied) => {
                occupied.insert(value.to_string());
            }
            Entry::Vacant(vacant) => {
                vacant.insert(value.to_string());
            }
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        if let Some((k, v)) = self.entries.remove(key) {
            self.current_size
                .fetch_sub(entry_size(&k, &v), Ordering::AcqRel);
        }
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, LocalStoreError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.key().starts_with(prefix))
            .map(|e| e.key().clone())
            .collect())
    }
}
