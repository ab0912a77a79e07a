// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_db;
use personrs::domain::models::task::{ScrapeTask, TaskStatus};
use personrs::domain::repositories::task_repository::TaskRepository;
use personrs::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn sample_task(first_name: &str) -> ScrapeTask {
    ScrapeTask::new(
        first_name.to_string(),
        "Svensson".to_string(),
        "Stockholm".to_string(),
    )
}

/// 测试任务创建与查询
///
/// 验证任务的所有字段在写入和读取之间保持一致。
#[tokio::test]
async fn test_create_and_find_round_trip() {
    let db = Arc::new(create_test_db().await);
    let repo = TaskRepositoryImpl::new(db);

    let task = sample_task("Anna");
    repo.create(&task).await.unwrap();

    let found = repo.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(found.id, task.id);
    assert_eq!(found.status, TaskStatus::Pending);
    assert_eq!(found.first_name, "Anna");
    assert_eq!(found.last_name, "Svensson");
    assert_eq!(found.city, "Stockholm");
    assert_eq!(found.attempt_count, 0);
    assert_eq!(found.max_attempts, 3);
    assert!(found.result.is_none());
    assert!(found.error.is_none());
    assert!(found.lock_token.is_none());

    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

/// 测试任务按创建顺序被领取
///
/// 验证acquire_next优先返回最早创建的Pending任务，
/// 领取后的任务处于Running状态并携带Worker的锁令牌。
#[tokio::test]
async fn test_acquire_next_takes_oldest_pending() {
    let db = Arc::new(create_test_db().await);
    let repo = TaskRepositoryImpl::new(db);
    let worker_id = Uuid::new_v4();

    let first = sample_task("Anna");
    repo.create(&first).await.unwrap();
    // Keep created_at strictly increasing
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = sample_task("Bo");
    repo.create(&second).await.unwrap();

    let acquired = repo.acquire_next(worker_id).await.unwrap().unwrap();
    assert_eq!(acquired.id, first.id);
    assert_eq!(acquired.status, TaskStatus::Running);
    assert_eq!(acquired.lock_token, Some(worker_id));
    assert!(acquired.started_at.is_some());

    let acquired = repo.acquire_next(worker_id).await.unwrap().unwrap();
    assert_eq!(acquired.id, second.id);

    // Nothing pending is left
    assert!(repo.acquire_next(worker_id).await.unwrap().is_none());
}

/// 测试领取后的任务对其他Worker不可见
#[tokio::test]
async fn test_acquired_task_is_hidden_from_other_workers() {
    let db = Arc::new(create_test_db().await);
    let repo = TaskRepositoryImpl::new(db);

    let task = sample_task("Anna");
    repo.create(&task).await.unwrap();

    let first_worker = Uuid::new_v4();
    let second_worker = Uuid::new_v4();

    let acquired = repo.acquire_next(first_worker).await.unwrap();
    assert!(acquired.is_some());

    let acquired = repo.acquire_next(second_worker).await.unwrap();
    assert!(acquired.is_none());
}

/// 测试尝试次数记录
#[tokio::test]
async fn test_record_attempt_updates_count() {
    let db = Arc::new(create_test_db().await);
    let repo = TaskRepositoryImpl::new(db);

    let task = sample_task("Anna");
    repo.create(&task).await.unwrap();

    repo.record_attempt(task.id, 1).await.unwrap();
    let found = repo.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(found.attempt_count, 1);

    repo.record_attempt(task.id, 3).await.unwrap();
    let found = repo.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(found.attempt_count, 3);
}

/// 测试终态写回
///
/// 验证成功与失败的终态通过update持久化，包括结果负载与错误描述。
#[tokio::test]
async fn test_update_persists_terminal_state() {
    let db = Arc::new(create_test_db().await);
    let repo = TaskRepositoryImpl::new(db);
    let worker_id = Uuid::new_v4();

    let success_task = sample_task("Anna");
    repo.create(&success_task).await.unwrap();

    let acquired = repo.acquire_next(worker_id).await.unwrap().unwrap();
    let payload = json!({"created": true});
    let completed = acquired.succeed(payload.clone()).unwrap();
    repo.update(&completed).await.unwrap();

    let found = repo.find_by_id(success_task.id).await.unwrap().unwrap();
    assert_eq!(found.status, TaskStatus::Success);
    assert_eq!(found.result, Some(payload));
    assert!(found.completed_at.is_some());

    let failure_task = sample_task("Bo");
    repo.create(&failure_task).await.unwrap();

    let acquired = repo.acquire_next(worker_id).await.unwrap().unwrap();
    let failed = acquired.fail("Timeout".to_string()).unwrap();
    repo.update(&failed).await.unwrap();

    let found = repo.find_by_id(failure_task.id).await.unwrap().unwrap();
    assert_eq!(found.status, TaskStatus::Failure);
    assert_eq!(found.error.as_deref(), Some("Timeout"));
}
