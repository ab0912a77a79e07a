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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、Worker和抓取引擎等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// Worker配置
    pub worker: WorkerSettings,
    /// 抓取引擎配置
    pub scraper: ScraperSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// Worker配置设置
#[derive(Debug, Deserialize)]
pub struct WorkerSettings {
    /// 并发Worker数量
    pub count: usize,
    /// 两次重试之间的等待时间（秒）
    pub retry_delay_secs: u64,
}

/// 抓取引擎配置设置
#[derive(Debug, Deserialize)]
pub struct ScraperSettings {
    /// 目标站点根URL
    pub base_url: String,
    /// 选择器规则文件路径（不含扩展名）
    pub selectors_path: String,
    /// 搜索结果链接选择器
    pub result_link_selector: String,
    /// 档案页就绪标志选择器
    pub content_ready_selector: String,
    /// 页面元素等待超时（秒）
    pub wait_timeout_secs: u64,
    /// 单次页面获取总超时（秒）
    pub fetch_timeout_secs: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default Worker settings
            .set_default("worker.count", 4)?
            .set_default("worker.retry_delay_secs", 60)?
            // Default Scraper settings
            .set_default("scraper.base_url", "https://www.merinfo.se")?
            .set_default("scraper.selectors_path", "config/selectors")?
            .set_default("scraper.result_link_selector", "a.person-search-result")?
            .set_default("scraper.content_ready_selector", "#merinfo-content")?
            .set_default("scraper.wait_timeout_secs", 10)?
            .set_default("scraper.fetch_timeout_secs", 60)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PERSONRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
