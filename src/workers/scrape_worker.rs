// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::models::task::ScrapeTask;
use crate::domain::repositories::person_repository::PersonRepository;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::extraction_service::ProfileExtractor;
use crate::domain::services::ingestion_service::{IngestError, IngestionOutcome, IngestionService};
use crate::engines::traits::{PageFetcher, SearchQuery};
use crate::queue::task_queue::TaskQueue;
use crate::utils::errors::ScrapeError;

/// 抓取工作者
///
/// 从队列领取任务，完成检索、抽取和落库全流程。
/// 非终态错误按固定间隔重试，直到尝试上限。
pub struct ScrapeWorker<R, P, F>
where
    R: TaskRepository + Send + Sync,
    P: PersonRepository + Send + Sync,
    F: PageFetcher + Send + Sync,
{
    repository: Arc<R>,
    ingestion: Arc<IngestionService<P>>,
    extractor: Arc<ProfileExtractor>,
    fetcher: Arc<F>,
    retry_delay: Duration,
    worker_id: Uuid,
}

impl<R, P, F> ScrapeWorker<R, P, F>
where
    R: TaskRepository + Send + Sync,
    P: PersonRepository + Send + Sync,
    F: PageFetcher + Send + Sync,
{
    /// 创建新的抓取工作器实例
    pub fn new(
        repository: Arc<R>,
        ingestion: Arc<IngestionService<P>>,
        extractor: Arc<ProfileExtractor>,
        fetcher: Arc<F>,
        retry_delay: Duration,
    ) -> Self {
        Self {
            repository,
            ingestion,
            extractor,
            fetcher,
            retry_delay,
            worker_id: Uuid::new_v4(),
        }
    }

    /// 运行抓取工作器
    pub async fn run<Q>(&self, queue: Arc<Q>)
    where
        Q: TaskQueue + Send + Sync,
    {
        info!("Scrape worker {} started", self.worker_id);

        loop {
            match self.process_next_task(queue.as_ref()).await {
                Ok(processed) => {
                    if !processed {
                        sleep(Duration::from_secs(1)).await;
                    }
                }
                Err(e) => {
                    error!("Error processing task: {}", e);
                    sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }

    async fn process_next_task<Q>(&self, queue: &Q) -> Result<bool>
    where
        Q: TaskQueue,
    {
        let task_opt = queue.dequeue(self.worker_id).await?;

        if let Some(task) = task_opt {
            self.process_task(task).await?;
            return Ok(true);
        }

        Ok(false)
    }

    #[instrument(skip(self, task), fields(task_id = %task.id, first_name = %task.first_name, last_name = %task.last_name, city = %task.city))]
    async fn process_task(&self, task: ScrapeTask) -> Result<()> {
        info!("Processing task");

        let query = SearchQuery {
            first_name: task.first_name.clone(),
            last_name: task.last_name.clone(),
            city: task.city.clone(),
        };

        match self.run_pipeline(&task, &query).await {
            Ok(outcome) => {
                info!(
                    "Profile '{}' ingested, created: {}",
                    outcome.person.full_name, outcome.created
                );
                let payload = serde_json::to_value(&outcome)?;
                let completed = task.succeed(payload)?;
                self.repository.update(&completed).await?;
            }
            Err(e) => {
                warn!("Task failed: {}", e);
                let failed = task.fail(e.to_string())?;
                self.repository.update(&failed).await?;
            }
        }

        Ok(())
    }

    /// 带重试地执行抓取流水线
    ///
    /// 终态错误立即返回，其余错误在固定间隔后重试。
    async fn run_pipeline(
        &self,
        task: &ScrapeTask,
        query: &SearchQuery,
    ) -> Result<IngestionOutcome, ScrapeError> {
        let mut last_error: Option<ScrapeError> = None;

        for attempt in 1..=task.max_attempts {
            if attempt > 1 {
                sleep(self.retry_delay).await;
            }

            if let Err(e) = self.repository.record_attempt(task.id, attempt).await {
                warn!("Failed to record attempt {}: {}", attempt, e);
            }

            match self.attempt_once(query).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_terminal() => return Err(e),
                Err(e) => {
                    warn!("Attempt {}/{} failed: {}", attempt, task.max_attempts, e);
                    last_error = Some(e);
                }
            }
        }

        Err(ScrapeError::RetriesExhausted {
            attempts: task.max_attempts,
            last: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempt was made".to_string()),
        })
    }

    /// 执行单次抓取尝试
    async fn attempt_once(&self, query: &SearchQuery) -> Result<IngestionOutcome, ScrapeError> {
        let html = self
            .fetcher
            .fetch_profile(query)
            .await
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;

        if html.trim().is_empty() {
            return Err(ScrapeError::Parse("Fetched document is empty".to_string()));
        }

        let candidate = self.extractor.extract(&html);

        match self.ingestion.ingest(&candidate).await {
            Ok(outcome) => Ok(outcome),
            Err(IngestError::MissingIdentity) => Err(ScrapeError::PersonNotFound(format!(
                "{} {}",
                query.first_name, query.last_name
            ))),
            Err(IngestError::Repository(e)) => Err(ScrapeError::Persistence(e.to_string())),
        }
    }
}
