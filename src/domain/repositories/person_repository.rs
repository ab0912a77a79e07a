// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::person::Person;
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 档案仓库特质
///
/// 定义人员档案及其子记录的数据访问接口
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// 根据全名查找档案，连同子记录一并加载
    async fn find_by_full_name(&self, full_name: &str)
        -> Result<Option<Person>, RepositoryError>;
    /// 根据ID查找档案，连同子记录一并加载
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Person>, RepositoryError>;
    /// 插入档案及其全部子记录
    ///
    /// 全名冲突时返回`RepositoryError::Conflict`。
    async fn insert(&self, person: &Person) -> Result<Person, RepositoryError>;
}
