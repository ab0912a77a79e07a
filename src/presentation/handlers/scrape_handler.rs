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

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, warn};
use validator::Validate;

use crate::{
    application::dto::{scrape_request::ScrapeRequestDto, scrape_response::ScrapeResponseDto},
    domain::models::task::ScrapeTask,
    infrastructure::repositories::task_repo_impl::TaskRepositoryImpl,
    queue::task_queue::{PostgresTaskQueue, TaskQueue},
};

/// 受理人员档案抓取请求
///
/// 校验检索参数后创建任务并入队，立即返回任务标识
pub async fn create_scrape(
    Extension(queue): Extension<Arc<PostgresTaskQueue<TaskRepositoryImpl>>>,
    Json(payload): Json<ScrapeRequestDto>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        warn!("Rejected scrape request: {}", errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": errors.to_string()
            })),
        )
            .into_response();
    }

    let task = ScrapeTask::new(
        payload.first_name.trim().to_string(),
        payload.last_name.trim().to_string(),
        payload.city.trim().to_string(),
    );

    match queue.enqueue(task.clone()).await {
        Ok(_) => {
            let response = ScrapeResponseDto {
                success: true,
                id: task.id,
                message: "Task accepted".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to enqueue task: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": e.to_string()
                })),
            )
                .into_response()
        }
    }
}
