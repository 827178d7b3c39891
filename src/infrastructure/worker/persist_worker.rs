//! Persist Worker - Background Annotation Write-back
//!
//! AI 缓存服务把标注写回提交到无界队列，Worker 在后台逐个写入持久化记录。
//! 尽力而为：失败只记录日志，不重试（代价只是之后多算一次）

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

use crate::application::ports::{PersistJob, PersistQueuePort, WallpaperRepositoryPort};

/// 基于 mpsc 无界通道的写回队列
#[derive(Clone)]
pub struct ChannelPersistQueue {
    sender: mpsc::UnboundedSender<PersistJob>,
}

impl ChannelPersistQueue {
    pub fn new(sender: mpsc::UnboundedSender<PersistJob>) -> Self {
        Self { sender }
    }

    /// 创建队列和对应的接收端
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PersistJob>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl PersistQueuePort for ChannelPersistQueue {
    fn submit(&self, job: PersistJob) {
        let content_id = job.content_id.clone();
        if let Err(e) = self.sender.send(job) {
            tracing::warn!(content_id = %content_id, error = %e, "Persist queue closed, dropping write");
        } else {
            tracing::debug!(content_id = %content_id, "Annotation write queued");
        }
    }
}

/// Worker 配置
#[derive(Debug, Clone)]
pub struct PersistWorkerConfig {
    /// 最大并发写入数
    pub max_concurrent: usize,
}

impl Default for PersistWorkerConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

/// 写回 Worker
pub struct PersistWorker {
    config: PersistWorkerConfig,
    queue_receiver: mpsc::UnboundedReceiver<PersistJob>,
    wallpaper_repo: Arc<dyn WallpaperRepositoryPort>,
}

impl PersistWorker {
    pub fn new(
        config: PersistWorkerConfig,
        queue_receiver: mpsc::UnboundedReceiver<PersistJob>,
        wallpaper_repo: Arc<dyn WallpaperRepositoryPort>,
    ) -> Self {
        Self {
            config,
            queue_receiver,
            wallpaper_repo,
        }
    }

    /// 启动 Worker，队列关闭且进行中的写入完成后返回
    pub async fn run(mut self) {
        let max_concurrent = self.config.max_concurrent.max(1);
        tracing::info!(max_concurrent = max_concurrent, "PersistWorker started");

        // 使用 semaphore 控制并发
        let semaphore = Arc::new(Semaphore::new(max_concurrent));

        while let Some(job) = self.queue_receiver.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to acquire semaphore permit");
                    continue;
                }
            };

            let wallpaper_repo = self.wallpaper_repo.clone();
            tokio::spawn(async move {
                let _permit = permit; // 持有 permit 直到写入完成
                Self::process_job(job, wallpaper_repo).await;
            });
        }

        // 等待进行中的写入
        if let Ok(permits) = semaphore.acquire_many(max_concurrent as u32).await {
            drop(permits);
        }

        tracing::info!("PersistWorker stopped");
    }

    /// 处理单个写回任务
    async fn process_job(job: PersistJob, wallpaper_repo: Arc<dyn WallpaperRepositoryPort>) {
        match wallpaper_repo
            .update_annotations(&job.content_id, &job.update)
            .await
        {
            Ok(()) => {
                tracing::debug!(content_id = %job.content_id, "Annotations persisted");
            }
            Err(e) => {
                tracing::warn!(
                    content_id = %job.content_id,
                    error = %e,
                    "Failed to persist annotations"
                );
            }
        }
    }
}
