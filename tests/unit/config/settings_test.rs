// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试配置加载和验证功能
/// 确保配置系统能够正确解析和验证各种配置参数
use personrs::config::settings::Settings;

#[test]
fn test_config_loading_with_defaults() {
    let settings = Settings::new().expect("Failed to load configuration");

    assert!(!settings.database.url.is_empty());
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 3000);

    assert!(settings.worker.count >= 1);
    assert!(settings.worker.retry_delay_secs >= 1);

    assert_eq!(settings.scraper.base_url, "https://www.merinfo.se");
    assert_eq!(settings.scraper.selectors_path, "config/selectors");
    assert!(!settings.scraper.result_link_selector.is_empty());
    assert!(!settings.scraper.content_ready_selector.is_empty());
    assert!(settings.scraper.wait_timeout_secs >= 1);
    assert!(settings.scraper.fetch_timeout_secs >= settings.scraper.wait_timeout_secs);
}
