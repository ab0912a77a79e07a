// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;
use personrs::domain::repositories::task_repository::TaskRepository;
use personrs::infrastructure::database::entities::task as task_entity;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;
use uuid::Uuid;

/// 测试公共端点
///
/// 验证健康检查与版本端点无需任何前置条件即可访问。
#[tokio::test]
async fn test_health_and_version_endpoints() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");

    let response = app.server.get("/v1/version").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), env!("CARGO_PKG_VERSION"));
}

/// 测试成功创建抓取任务
///
/// 验证当提供有效负载时，/v1/scrape端点创建一个Pending任务并返回其ID。
#[tokio::test]
async fn test_create_scrape_task_success() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/scrape")
        .json(&json!({
            "first_name": "Anna",
            "last_name": "Svensson",
            "city": "Stockholm"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);

    let task_response: serde_json::Value = response.json();
    assert_eq!(task_response["success"], true);
    let task_id = Uuid::parse_str(task_response["id"].as_str().unwrap()).unwrap();

    // Verify the task was created in the database
    let task = task_entity::Entity::find()
        .filter(task_entity::Column::Id.eq(task_id))
        .one(app.db_pool.as_ref())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(task.status, "pending");
    assert_eq!(task.first_name, "Anna");
    assert_eq!(task.last_name, "Svensson");
    assert_eq!(task.city, "Stockholm");
}

/// 测试请求字段修剪
///
/// 验证首尾空白在入库前被去除。
#[tokio::test]
async fn test_create_scrape_trims_fields() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/scrape")
        .json(&json!({
            "first_name": "  Bo ",
            "last_name": " Ek",
            "city": "Umeå "
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);

    let task_response: serde_json::Value = response.json();
    let task_id = Uuid::parse_str(task_response["id"].as_str().unwrap()).unwrap();

    let task = app.task_repo.find_by_id(task_id).await.unwrap().unwrap();
    assert_eq!(task.first_name, "Bo");
    assert_eq!(task.last_name, "Ek");
    assert_eq!(task.city, "Umeå");
}

/// 测试空字段被拒绝
///
/// 验证空的检索参数返回400而不创建任务。
#[tokio::test]
async fn test_create_scrape_rejects_blank_fields() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/scrape")
        .json(&json!({
            "first_name": "",
            "last_name": "Svensson",
            "city": "Stockholm"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("first_name cannot be empty"));

    let count = task_entity::Entity::find()
        .all(app.db_pool.as_ref())
        .await
        .unwrap()
        .len();
    assert_eq!(count, 0);
}

/// 测试负载缺少字段被拒绝
#[tokio::test]
async fn test_create_scrape_rejects_incomplete_payload() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/scrape")
        .json(&json!({
            "first_name": "Anna"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// 测试查询不存在的任务
#[tokio::test]
async fn test_get_unknown_task_returns_404() {
    let app = create_test_app().await;

    let response = app
        .server
        .get(&format!("/v1/tasks/{}", Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Task not found");
}

/// 测试未完成任务的状态响应
///
/// 验证Pending任务返回202与处理中提示。
#[tokio::test]
async fn test_pending_task_reports_processing() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/scrape")
        .json(&json!({
            "first_name": "Anna",
            "last_name": "Svensson",
            "city": "Stockholm"
        }))
        .await;
    let task_id = response.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.server.get(&format!("/v1/tasks/{}", task_id)).await;

    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["message"], "Task is still processing.");
}

/// 测试成功任务的状态响应
///
/// 验证终态Success任务返回200与结果负载。
#[tokio::test]
async fn test_completed_task_returns_result() {
    let app = create_test_app().await;

    app.server
        .post("/v1/scrape")
        .json(&json!({
            "first_name": "Anna",
            "last_name": "Svensson",
            "city": "Stockholm"
        }))
        .await;

    // Drive the task to Success the way a worker would
    let worker_id = Uuid::new_v4();
    let task = app
        .task_repo
        .acquire_next(worker_id)
        .await
        .unwrap()
        .expect("No task to acquire");
    let completed = task
        .succeed(json!({"created": true, "person": {"full_name": "Anna Svensson"}}))
        .unwrap();
    app.task_repo.update(&completed).await.unwrap();

    let response = app
        .server
        .get(&format!("/v1/tasks/{}", completed.id))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "success");
    assert_eq!(body["result"]["created"], true);
    assert_eq!(body["result"]["person"]["full_name"], "Anna Svensson");
}

/// 测试失败任务的状态响应
///
/// 验证终态Failure任务返回500与错误描述。
#[tokio::test]
async fn test_failed_task_returns_error() {
    let app = create_test_app().await;

    app.server
        .post("/v1/scrape")
        .json(&json!({
            "first_name": "Anna",
            "last_name": "Svensson",
            "city": "Stockholm"
        }))
        .await;

    let worker_id = Uuid::new_v4();
    let task = app
        .task_repo
        .acquire_next(worker_id)
        .await
        .unwrap()
        .expect("No task to acquire");
    let failed = task
        .fail("All 3 attempts failed, last error: Timeout".to_string())
        .unwrap();
    app.task_repo.update(&failed).await.unwrap();

    let response = app.server.get(&format!("/v1/tasks/{}", failed.id)).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], "failure");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("All 3 attempts failed"));
}
