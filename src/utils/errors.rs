// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 抓取流水线错误类型
///
/// 覆盖单次任务执行的各个阶段：页面获取、解析、落库。
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// 目标人员不存在，重试无意义
    #[error("No profile found for '{0}'")]
    PersonNotFound(String),

    /// 页面获取失败
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// 文档解析失败
    #[error("Parse failed: {0}")]
    Parse(String),

    /// 持久化失败
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// 重试次数耗尽
    #[error("All {attempts} attempts failed, last error: {last}")]
    RetriesExhausted { attempts: i32, last: String },
}

impl ScrapeError {
    /// 判断错误是否为终态
    ///
    /// 终态错误不应再次重试。
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScrapeError::PersonNotFound(_) | ScrapeError::RetriesExhausted { .. }
        )
    }
}
