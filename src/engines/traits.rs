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

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 页面导航或元素交互失败
    #[error("Navigation error: {0}")]
    Navigation(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 浏览器实例错误
    #[error("Browser error: {0}")]
    Browser(String),
}

/// 人员检索条件
///
/// 对应一次任务的检索输入，用于构造目标站点的搜索URL。
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// 目标人员的名
    pub first_name: String,
    /// 目标人员的姓
    pub last_name: String,
    /// 目标人员所在城市
    pub city: String,
}

impl SearchQuery {
    /// 构造搜索URL
    ///
    /// 查询词按`名+姓+城市`顺序以加号连接，各部分经过百分号编码。
    ///
    /// # 参数
    ///
    /// * `base` - 目标站点根URL
    ///
    /// # 返回值
    ///
    /// 返回完整的搜索URL
    pub fn search_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_path("/search");
        url.set_query(Some(&format!(
            "q={}+{}+{}",
            urlencoding::encode(self.first_name.trim()),
            urlencoding::encode(self.last_name.trim()),
            urlencoding::encode(self.city.trim())
        )));
        url
    }
}

/// 档案页获取特质
///
/// 按检索条件取回目标人员档案页的完整HTML。
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 检索并获取档案页HTML
    async fn fetch_profile(&self, query: &SearchQuery) -> Result<String, EngineError>;
}
