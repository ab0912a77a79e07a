// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Extension;
use axum_test::TestServer;
use migration::{Migrator, MigratorTrait};
use personrs::config::settings::DatabaseSettings;
use personrs::infrastructure::database::connection;
use personrs::infrastructure::repositories::person_repo_impl::PersonRepositoryImpl;
use personrs::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use personrs::presentation::routes;
use personrs::queue::task_queue::PostgresTaskQueue;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db_pool: Arc<DatabaseConnection>,
    pub task_repo: Arc<TaskRepositoryImpl>,
    pub person_repo: Arc<PersonRepositoryImpl>,
}

/// 创建内存数据库连接并应用迁移
///
/// 连接池固定为单连接，保证所有操作命中同一个内存库
pub async fn create_test_db() -> DatabaseConnection {
    let db_settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout: None,
        idle_timeout: None,
    };

    let db = connection::create_pool(&db_settings)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Migrations failed");
    db
}

/// 创建测试应用
///
/// 路由与主程序一致，但不启动Worker，任务由测试用例自行驱动
pub async fn create_test_app() -> TestApp {
    let db_pool = Arc::new(create_test_db().await);

    let task_repo = Arc::new(TaskRepositoryImpl::new(db_pool.clone()));
    let person_repo = Arc::new(PersonRepositoryImpl::new(db_pool.clone()));
    let queue = Arc::new(PostgresTaskQueue::new(task_repo.clone()));

    let app = routes::routes()
        .layer(Extension(queue))
        .layer(Extension(task_repo.clone()));

    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        db_pool,
        task_repo,
        person_repo,
    }
}
