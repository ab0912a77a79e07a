// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::ScrapeTask;
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 唯一约束冲突
    #[error("Unique constraint violated: {0}")]
    Conflict(String),
}

/// 任务仓库特质
///
/// 定义任务数据访问接口
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, task: &ScrapeTask) -> Result<ScrapeTask, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeTask>, RepositoryError>;
    /// 更新任务
    async fn update(&self, task: &ScrapeTask) -> Result<ScrapeTask, RepositoryError>;
    /// 获取下一个待处理任务并锁定
    async fn acquire_next(&self, worker_id: Uuid) -> Result<Option<ScrapeTask>, RepositoryError>;
    /// 记录任务的当前尝试次数
    async fn record_attempt(&self, id: Uuid, attempt: i32) -> Result<(), RepositoryError>;
}
