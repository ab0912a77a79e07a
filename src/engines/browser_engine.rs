// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScraperSettings;
use crate::engines::traits::{EngineError, PageFetcher, SearchQuery};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

// Global browser instance to avoid re-launching Chrome on every request.
static BROWSER_INSTANCE: OnceCell<Browser> = OnceCell::const_new();

// Asynchronously gets or initializes the shared browser instance.
// This function ensures that the browser is launched only once.
pub async fn get_browser() -> Result<&'static Browser, EngineError> {
    BROWSER_INSTANCE
        .get_or_try_init(|| async {
            let remote_debugging_url = std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok();

            let (browser, mut handler) = if let Some(ref url) = remote_debugging_url {
                tracing::info!("Connecting to remote Chrome instance at: {}", url);
                Browser::connect(url).await.map_err(|e| {
                    EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
                })?
            } else {
                let config = BrowserConfig::builder()
                    .no_sandbox()
                    .request_timeout(Duration::from_secs(30))
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage")
                    .build()
                    .map_err(EngineError::Browser)?;

                Browser::launch(config)
                    .await
                    .map_err(|e| EngineError::Browser(e.to_string()))?
            };

            // Spawn a handler to process browser events
            tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(browser)
        })
        .await
}

/// 浏览器引擎
///
/// 基于chromiumoxide实现的档案页获取引擎。目标站点的搜索
/// 结果与档案内容由JavaScript渲染，需要完整的浏览器环境。
pub struct BrowserEngine {
    base_url: Url,
    result_link_selector: String,
    content_ready_selector: String,
    wait_timeout: Duration,
    fetch_timeout: Duration,
}

impl BrowserEngine {
    /// 创建新的浏览器引擎
    ///
    /// # 参数
    ///
    /// * `settings` - 抓取引擎配置
    ///
    /// # 返回值
    ///
    /// * `Ok(BrowserEngine)` - 新的引擎实例
    /// * `Err(EngineError)` - 根URL无法解析
    pub fn new(settings: &ScraperSettings) -> Result<Self, EngineError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            EngineError::Navigation(format!("Invalid base URL '{}': {}", settings.base_url, e))
        })?;

        Ok(Self {
            base_url,
            result_link_selector: settings.result_link_selector.clone(),
            content_ready_selector: settings.content_ready_selector.clone(),
            wait_timeout: Duration::from_secs(settings.wait_timeout_secs),
            fetch_timeout: Duration::from_secs(settings.fetch_timeout_secs),
        })
    }

    /// 轮询等待元素出现，超过等待上限返回Timeout
    async fn wait_for_element(&self, page: &Page, selector: &str) -> Result<(), EngineError> {
        let deadline = tokio::time::Instant::now() + self.wait_timeout;
        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(EngineError::Timeout);
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }

    /// 打开搜索页，进入第一条结果，等待档案内容就绪后取回HTML
    async fn drive(&self, page: &Page, url: &str) -> Result<String, EngineError> {
        page.goto(url)
            .await
            .map_err(|e| EngineError::Navigation(format!("Failed to open search page: {}", e)))?;

        self.wait_for_element(page, &self.result_link_selector)
            .await?;
        page.find_element(&self.result_link_selector)
            .await
            .map_err(|e| {
                EngineError::Navigation(format!("Search result link not found: {}", e))
            })?
            .click()
            .await
            .map_err(|e| {
                EngineError::Navigation(format!("Failed to open first search result: {}", e))
            })?;

        self.wait_for_element(page, &self.content_ready_selector)
            .await?;

        page.content()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))
    }
}

#[async_trait]
impl PageFetcher for BrowserEngine {
    /// 检索并获取档案页HTML
    ///
    /// # 参数
    ///
    /// * `query` - 人员检索条件
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 档案页完整HTML
    /// * `Err(EngineError)` - 检索、导航或超时错误
    async fn fetch_profile(&self, query: &SearchQuery) -> Result<String, EngineError> {
        let url = query.search_url(&self.base_url);
        tracing::debug!("Fetching profile via {}", url);

        let browser = get_browser().await?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        let result = tokio::time::timeout(self.fetch_timeout, self.drive(&page, url.as_str())).await;

        // Close on every path so tabs do not accumulate
        let _ = page.close().await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(EngineError::Timeout),
        }
    }
}
