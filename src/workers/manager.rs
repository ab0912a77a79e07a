// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::person_repository::PersonRepository;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::extraction_service::ProfileExtractor;
use crate::domain::services::ingestion_service::IngestionService;
use crate::engines::traits::PageFetcher;
use crate::queue::task_queue::TaskQueue;
use crate::workers::scrape_worker::ScrapeWorker;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
pub struct WorkerManager<Q, R, P, F>
where
    Q: TaskQueue + 'static,
    R: TaskRepository + 'static,
    P: PersonRepository + 'static,
    F: PageFetcher + 'static,
{
    queue: Arc<Q>,
    repository: Arc<R>,
    ingestion: Arc<IngestionService<P>>,
    extractor: Arc<ProfileExtractor>,
    fetcher: Arc<F>,
    retry_delay: Duration,
    handles: Vec<JoinHandle<()>>,
}

impl<Q, R, P, F> WorkerManager<Q, R, P, F>
where
    Q: TaskQueue + Send + Sync,
    R: TaskRepository + Send + Sync,
    P: PersonRepository + Send + Sync,
    F: PageFetcher + Send + Sync,
{
    pub fn new(
        queue: Arc<Q>,
        repository: Arc<R>,
        ingestion: Arc<IngestionService<P>>,
        extractor: Arc<ProfileExtractor>,
        fetcher: Arc<F>,
        retry_delay: Duration,
    ) -> Self {
        Self {
            queue,
            repository,
            ingestion,
            extractor,
            fetcher,
            retry_delay,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// 创建并启动指定数量的工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量
    pub async fn start_workers(&mut self, count: usize) {
        for _ in 0..count {
            let worker = ScrapeWorker::new(
                self.repository.clone(),
                self.ingestion.clone(),
                self.extractor.clone(),
                self.fetcher.clone(),
                self.retry_delay,
            );

            let queue = self.queue.clone();
            // We spawn the worker loop on a separate task to avoid blocking the main thread
            // or the loop that spawns workers.
            let handle = tokio::spawn(async move {
                worker.run(queue).await;
            });
            self.handles.push(handle);
        }
    }

    /// 等待关闭信号并关闭工作进程
    ///
    /// 监听关闭信号并优雅地关闭所有工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        info!("Shutting down workers...");
        for handle in &self.handles {
            handle.abort();
        }

        info!("Workers shut down successfully");
    }
}
