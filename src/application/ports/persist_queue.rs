//! Persist Queue Port - 持久化后台队列
//!
//! 缓存服务把标注写回提交到这里后立即返回，不等待、不接收结果

use crate::domain::wallpaper::{AnnotationUpdate, ContentId};

/// 一次待写回的标注
#[derive(Debug, Clone, PartialEq)]
pub struct PersistJob {
    pub content_id: ContentId,
    pub update: AnnotationUpdate,
}

/// Persist Queue Port
pub trait PersistQueuePort: Send + Sync {
    /// 提交写回任务，不阻塞调用方，失败只记录日志
    fn submit(&self, job: PersistJob);
}
