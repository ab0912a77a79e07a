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

use crate::domain::models::task::{ScrapeTask, TaskStatus};
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use crate::infrastructure::database::entities::task as task_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, LockBehavior, LockType},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 任务仓库实现
///
/// 基于SeaORM实现的任务数据访问层
#[derive(Clone)]
pub struct TaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl TaskRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<task_entity::Model> for ScrapeTask {
    fn from(model: task_entity::Model) -> Self {
        Self {
            id: model.id,
            status: model.status.parse().unwrap_or_default(),
            first_name: model.first_name,
            last_name: model.last_name,
            city: model.city,
            result: model.result,
            error: model.error,
            attempt_count: model.attempt_count,
            max_attempts: model.max_attempts,
            lock_token: model.lock_token,
            created_at: model.created_at,
            started_at: model.started_at,
            completed_at: model.completed_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ScrapeTask> for task_entity::ActiveModel {
    fn from(task: ScrapeTask) -> Self {
        Self {
            id: Set(task.id),
            status: Set(task.status.to_string()),
            first_name: Set(task.first_name.clone()),
            last_name: Set(task.last_name.clone()),
            city: Set(task.city.clone()),
            result: Set(task.result.clone()),
            error: Set(task.error.clone()),
            attempt_count: Set(task.attempt_count),
            max_attempts: Set(task.max_attempts),
            lock_token: Set(task.lock_token),
            created_at: Set(task.created_at),
            started_at: Set(task.started_at),
            completed_at: Set(task.completed_at),
            updated_at: Set(task.updated_at),
        }
    }
}

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    async fn create(&self, task: &ScrapeTask) -> Result<ScrapeTask, RepositoryError> {
        let model: task_entity::ActiveModel = task.clone().into();

        model.insert(self.db.as_ref()).await?;
        Ok(task.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeTask>, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn update(&self, task: &ScrapeTask) -> Result<ScrapeTask, RepositoryError> {
        let mut model: task_entity::ActiveModel = task.clone().into();

        model.status = Set(task.status.to_string());
        model.result = Set(task.result.clone());
        model.error = Set(task.error.clone());
        model.completed_at = Set(task.completed_at);
        model.updated_at = Set(Utc::now().into());

        let updated_model = model.update(self.db.as_ref()).await?;
        Ok(updated_model.into())
    }

    async fn acquire_next(&self, worker_id: Uuid) -> Result<Option<ScrapeTask>, RepositoryError> {
        let txn = self.db.begin().await?;

        let task = task_entity::Entity::find()
            .filter(task_entity::Column::Status.eq(TaskStatus::Pending.to_string()))
            .order_by_asc(task_entity::Column::CreatedAt)
            .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
            .one(&txn)
            .await?;

        if let Some(model) = task {
            let mut active: task_entity::ActiveModel = model.into();
            active.lock_token = Set(Some(worker_id));
            active.status = Set(TaskStatus::Running.to_string());
            active.started_at = Set(Some(Utc::now().into()));
            active.updated_at = Set(Utc::now().into());

            let updated = active.update(&txn).await?;
            txn.commit().await?;

            return Ok(Some(updated.into()));
        }

        txn.commit().await?;
        Ok(None)
    }

    async fn record_attempt(&self, id: Uuid, attempt: i32) -> Result<(), RepositoryError> {
        task_entity::Entity::update_many()
            .col_expr(task_entity::Column::AttemptCount, Expr::value(attempt))
            .col_expr(
                task_entity::Column::UpdatedAt,
                Expr::value(sea_orm::prelude::ChronoDateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(task_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}
