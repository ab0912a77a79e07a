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

use axum::Extension;
use personrs::config::selector_rules::SelectorRuleSet;
use personrs::config::settings::Settings;
use personrs::domain::services::extraction_service::ProfileExtractor;
use personrs::domain::services::ingestion_service::IngestionService;
use personrs::engines::browser_engine::BrowserEngine;
use personrs::infrastructure::database::connection;
use personrs::infrastructure::repositories::person_repo_impl::PersonRepositoryImpl;
use personrs::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use personrs::presentation::routes;
use personrs::queue::task_queue::PostgresTaskQueue;
use personrs::workers::manager::WorkerManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use migration::{Migrator, MigratorTrait};
use personrs::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting personrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Load selector rules
    let rules = Arc::new(SelectorRuleSet::load(&settings.scraper.selectors_path)?);
    info!("Loaded {} selector rules", rules.len());

    // 4. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 5. Initialize Components
    let task_repo = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let person_repo = Arc::new(PersonRepositoryImpl::new(db.clone()));
    let queue = Arc::new(PostgresTaskQueue::new(task_repo.clone()));
    let ingestion = Arc::new(IngestionService::new(person_repo.clone()));
    let extractor = Arc::new(ProfileExtractor::new(rules.clone()));
    let fetcher = Arc::new(BrowserEngine::new(&settings.scraper)?);

    // 6. Start Workers
    let mut worker_manager = WorkerManager::new(
        queue.clone(),
        task_repo.clone(),
        ingestion.clone(),
        extractor.clone(),
        fetcher.clone(),
        Duration::from_secs(settings.worker.retry_delay_secs),
    );
    worker_manager.start_workers(settings.worker.count).await;
    info!("Started {} scrape workers", settings.worker.count);

    // 7. Start HTTP server
    let app = routes::routes()
        .layer(Extension(queue))
        .layer(Extension(task_repo.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    // Serve until the shutdown signal arrives, then stop the workers
    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = worker_manager.wait_for_shutdown() => {}
    }

    Ok(())
}
