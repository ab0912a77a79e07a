// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 抓取任务实体
///
/// 表示对一个目标人员的完整抓取请求：按姓名和城市检索档案页、
/// 抽取字段并落库。任务具有状态、重试计数和锁定机制等属性。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeTask {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 任务状态，跟踪任务在其生命周期中的当前阶段
    pub status: TaskStatus,
    /// 目标人员的名
    pub first_name: String,
    /// 目标人员的姓
    pub last_name: String,
    /// 目标人员所在城市
    pub city: String,
    /// 成功后的结果负载，包含落库档案与创建标志
    pub result: Option<serde_json::Value>,
    /// 失败后的错误描述
    pub error: Option<String>,
    /// 已尝试次数，记录任务已经尝试执行的次数
    pub attempt_count: i32,
    /// 最大尝试次数，任务失败前的尝试上限
    pub max_attempts: i32,
    /// 锁定令牌，用于多Worker环境下的任务锁定
    pub lock_token: Option<Uuid>,
    /// 创建时间，任务创建的时间戳
    pub created_at: DateTime<FixedOffset>,
    /// 开始执行时间，任务开始处理的时间戳
    pub started_at: Option<DateTime<FixedOffset>>,
    /// 完成时间，任务进入终态的时间戳
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 更新时间，任务信息最后更新的时间戳
    pub updated_at: DateTime<FixedOffset>,
}

/// 任务状态枚举
///
/// 表示任务在其生命周期中的不同状态，用于跟踪任务的执行进度。
/// 状态转换遵循以下流程：
/// Pending → Running → Success/Failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 等待中，任务已创建但尚未开始执行
    #[default]
    Pending,
    /// 执行中，任务正在被Worker处理
    Running,
    /// 已成功，档案已抽取并落库
    Success,
    /// 已失败，任务执行失败且不再重试
    Failure,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Success => write!(f, "success"),
            TaskStatus::Failure => write!(f, "failure"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "success" => Ok(TaskStatus::Success),
            "failure" => Ok(TaskStatus::Failure),
            _ => Err(()),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换，当任务状态转换不符合业务规则时发生
    #[error("Invalid state transition")]
    InvalidStateTransition,
}

impl ScrapeTask {
    /// 创建一个新的抓取任务
    ///
    /// # 参数
    ///
    /// * `first_name` - 目标人员的名
    /// * `last_name` - 目标人员的姓
    /// * `city` - 目标人员所在城市
    ///
    /// # 返回值
    ///
    /// 返回新创建的任务实例，初始状态为Pending
    pub fn new(first_name: String, last_name: String, city: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: TaskStatus::Pending,
            first_name,
            last_name,
            city,
            result: None,
            error: None,
            attempt_count: 0,
            max_attempts: 3,
            lock_token: None,
            created_at: Utc::now().into(),
            started_at: None,
            completed_at: None,
            updated_at: Utc::now().into(),
        }
    }

    /// 启动任务
    ///
    /// 将任务状态从Pending变更为Running
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeTask)` - 成功启动的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn start(mut self) -> Result<Self, DomainError> {
        match self.status {
            TaskStatus::Pending => {
                self.status = TaskStatus::Running;
                self.started_at = Some(Utc::now().into());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 标记任务成功
    ///
    /// 将任务状态从Running变更为Success并记录结果负载
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeTask)` - 成功完成的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn succeed(mut self, result: serde_json::Value) -> Result<Self, DomainError> {
        match self.status {
            TaskStatus::Running => {
                self.status = TaskStatus::Success;
                self.result = Some(result);
                self.completed_at = Some(Utc::now().into());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 标记任务失败
    ///
    /// 将任务状态从Running变更为Failure并记录错误描述
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeTask)` - 失败的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn fail(mut self, error: String) -> Result<Self, DomainError> {
        match self.status {
            TaskStatus::Running => {
                self.status = TaskStatus::Failure;
                self.error = Some(error);
                self.completed_at = Some(Utc::now().into());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 判断任务是否处于终态
    ///
    /// # 返回值
    ///
    /// 任务状态为Success或Failure时返回true，否则返回false
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, TaskStatus::Success | TaskStatus::Failure)
    }
}
