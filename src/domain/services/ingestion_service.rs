// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::domain::models::person::{Person, ProfileCandidate};
use crate::domain::repositories::person_repository::PersonRepository;
use crate::domain::repositories::task_repository::RepositoryError;

/// 落库错误类型
#[derive(Error, Debug)]
pub enum IngestError {
    /// 候选缺少全名，无法确定档案身份
    #[error("Profile has no full name, cannot be ingested")]
    MissingIdentity,
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// 落库结果
#[derive(Debug, Clone, Serialize)]
pub struct IngestionOutcome {
    /// 落库后的档案聚合
    pub person: Person,
    /// 本次是否新建了档案
    pub created: bool,
}

/// 落库服务
///
/// 以全名为自然键将抽取候选收敛为唯一档案。
/// 已存在的档案不会被覆盖，直接返回库中记录。
pub struct IngestionService<P: PersonRepository> {
    repository: Arc<P>,
}

impl<P: PersonRepository> IngestionService<P> {
    /// 创建新的落库服务
    pub fn new(repository: Arc<P>) -> Self {
        Self { repository }
    }

    /// 将抽取候选落库
    ///
    /// # 参数
    ///
    /// * `candidate` - 档案抽取候选
    ///
    /// # 返回值
    ///
    /// * `Ok(IngestionOutcome)` - 落库后的档案与创建标志
    /// * `Err(IngestError)` - 候选缺少全名或仓库操作失败
    pub async fn ingest(
        &self,
        candidate: &ProfileCandidate,
    ) -> Result<IngestionOutcome, IngestError> {
        let person = Person::from_candidate(candidate).ok_or(IngestError::MissingIdentity)?;

        if let Some(existing) = self.repository.find_by_full_name(&person.full_name).await? {
            info!("Profile '{}' already ingested, reusing record", existing.full_name);
            return Ok(IngestionOutcome {
                person: existing,
                created: false,
            });
        }

        match self.repository.insert(&person).await {
            Ok(stored) => Ok(IngestionOutcome {
                person: stored,
                created: true,
            }),
            Err(RepositoryError::Conflict(full_name)) => {
                // Another worker stored the same profile between lookup and insert
                info!("Profile '{}' was ingested concurrently, reusing record", full_name);
                let existing = self
                    .repository
                    .find_by_full_name(&full_name)
                    .await?
                    .ok_or(RepositoryError::NotFound)?;
                Ok(IngestionOutcome {
                    person: existing,
                    created: false,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
