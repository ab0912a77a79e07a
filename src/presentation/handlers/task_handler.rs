// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::task::TaskStatus;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use crate::presentation::errors::AppError;

/// 查询抓取任务状态
///
/// 终态任务返回抓取结果或失败原因，未完成任务返回处理中提示
///
/// # 参数
///
/// * `id` - 任务ID
/// * `repository` - 任务仓库
///
/// # 返回值
///
/// * `Ok(Response)` - 任务状态响应
/// * `Err(AppError)` - 查询失败
pub async fn get_task_status(
    Path(id): Path<Uuid>,
    Extension(repository): Extension<Arc<TaskRepositoryImpl>>,
) -> Result<Response, AppError> {
    let task = repository.find_by_id(id).await?;

    let Some(task) = task else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "success": false,
                "error": "Task not found"
            })),
        )
            .into_response());
    };

    let response = match task.status {
        TaskStatus::Pending | TaskStatus::Running => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({
                "success": true,
                "id": task.id,
                "status": task.status,
                "message": "Task is still processing."
            })),
        )
            .into_response(),
        TaskStatus::Success => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "id": task.id,
                "status": task.status,
                "result": task.result,
            })),
        )
            .into_response(),
        TaskStatus::Failure => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "id": task.id,
                "status": task.status,
                "error": task.error,
            })),
        )
            .into_response(),
    };

    Ok(response)
}
