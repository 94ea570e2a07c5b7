//! 环境变量配置解析
//!
//! 进程启动时将环境变量一次性解析为不可变的 [`Config`]，
//! 单项解析失败时降级为默认值并记录警告，不中断启动

use crate::config::types::{
    default_always_on_file, default_branch, default_time_gated_files, default_timezone, Config,
    GithubConfig, ProbeConfig, TelegramConfig,
};
use crate::scheduler::window::PauseWindow;
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::{debug, warn};

impl Config {
    /// 从环境变量构建配置
    ///
    /// 所有变量均为可选项，缺失或无法解析时使用默认值。
    /// 该函数只在进程启动时调用一次，返回的配置此后不再变化。
    pub fn from_env() -> Self {
        let probe_defaults = ProbeConfig::default();
        let pause_defaults = PauseWindow::default();

        let github = resolve_github_config();

        let config = Self {
            telegram: TelegramConfig {
                token: env_string("TG_TOKEN"),
                chat_id: env_string("TG_ID"),
            },
            github,
            probe: ProbeConfig {
                timeout_ms: parse_env("REQUEST_TIMEOUT", probe_defaults.timeout_ms),
                max_retries: parse_env("MAX_RETRIES", probe_defaults.max_retries),
                ..probe_defaults
            },
            pause: PauseWindow::new(
                parse_hour("PAUSE_START_HOUR", pause_defaults.start_hour),
                parse_hour("PAUSE_END_HOUR", pause_defaults.end_hour),
            ),
            timezone: parse_timezone(),
            always_on_file: env_string("URL_24H_FILE").unwrap_or_else(default_always_on_file),
            time_gated_files: parse_file_list(),
            static_always_on_urls: build_always_on_urls(),
            static_time_gated_urls: scan_numbered_urls("WEBSITE"),
            send_summary: env_string("SEND_SUMMARY")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        };

        debug!(
            "配置解析完成: 静态全天候URL {} 个, 静态分时段URL {} 个, 远程获取{}",
            config.static_always_on_urls.len(),
            config.static_time_gated_urls.len(),
            if config.github.is_configured() {
                "已启用"
            } else {
                "未配置"
            }
        );

        config
    }
}

/// 读取环境变量，空白值视为未设置
fn env_string(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

/// 解析数值型环境变量，解析失败时记录警告并返回默认值
fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match env_string(name) {
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("环境变量 {} 解析失败: {}，使用默认值 {}", name, value, default);
                default
            }
        },
        None => default,
    }
}

/// 解析小时数，超出 0-23 范围时记录警告并返回默认值
fn parse_hour(name: &str, default: u32) -> u32 {
    let hour = parse_env(name, default);
    if hour > 23 {
        warn!("环境变量 {} 超出小时范围: {}，使用默认值 {}", name, hour, default);
        default
    } else {
        hour
    }
}

/// 解析时区名称，无法识别时记录警告并回退到默认时区
fn parse_timezone() -> Tz {
    match env_string("TIMEZONE") {
        Some(name) => match name.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                let fallback = default_timezone();
                warn!("无法识别的时区名称: {}，使用默认时区 {}", name, fallback);
                fallback
            }
        },
        None => default_timezone(),
    }
}

/// 解析GitHub仓库配置，坐标格式非法时禁用远程获取
fn resolve_github_config() -> GithubConfig {
    let token = env_string("GITHUB_TOKEN");
    let repo = match env_string("GITHUB_REPO") {
        Some(coordinate) => {
            let mut parts = coordinate.splitn(2, '/');
            let owner = parts.next().unwrap_or("");
            let name = parts.next().unwrap_or("");
            if owner.is_empty() || name.is_empty() {
                warn!("仓库坐标格式无效: {}，远程清单获取已禁用", coordinate);
                None
            } else {
                Some(coordinate)
            }
        }
        None => None,
    };

    GithubConfig {
        token,
        repo,
        branch: env_string("GITHUB_BRANCH").unwrap_or_else(default_branch),
    }
}

/// 解析分时段清单文件列表（逗号分隔）
fn parse_file_list() -> Vec<String> {
    match env_string("TIME_URL_FILES") {
        Some(value) => value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
        None => default_time_gated_files(),
    }
}

/// 扫描带编号的URL环境变量（如 URL_1, URL_2, ...），遇到第一个缺失的编号即停止
fn scan_numbered_urls(prefix: &str) -> Vec<String> {
    let mut urls = Vec::new();
    for index in 1.. {
        match env_string(&format!("{prefix}_{index}")) {
            Some(url) => urls.push(url),
            None => break,
        }
    }
    urls
}

/// 收集托管平台注入的自身访问地址
///
/// 支持 Hugging Face Spaces、Render、Koyeb、IDX 工作区和 CodeSandbox，
/// 检测到的地址排在全天候清单最前面
fn platform_urls() -> Vec<String> {
    let mut urls = Vec::new();

    if let Some(host) = env_string("SPACE_HOST") {
        urls.push(format!("https://{host}"));
    }

    if let Some(url) = env_string("RENDER_EXTERNAL_URL") {
        urls.push(url);
    }

    if let Some(domain) = env_string("KOYEB_PUBLIC_DOMAIN") {
        urls.push(format!("https://{domain}"));
    }

    if let Some(domain) = env_string("WORKSPACE_DEV_DOMAIN") {
        urls.push(format!("https://{domain}"));
    }

    if let Some(preview_host) = env_string("CSB_BASE_PREVIEW_HOST") {
        if let (Some(sandbox_id), Some(port)) = (env_string("CSB_SANDBOX_ID"), env_string("PORT"))
        {
            urls.push(format!("https://{sandbox_id}-{port}.{preview_host}"));
        }
    }

    urls
}

/// 组装静态全天候URL列表：平台地址在前，编号环境变量在后
fn build_always_on_urls() -> Vec<String> {
    let mut urls = platform_urls();
    urls.extend(scan_numbered_urls("URL"));
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// 清理本模块测试涉及的全部环境变量
    fn clear_env() {
        for name in [
            "TG_TOKEN",
            "TG_ID",
            "GITHUB_TOKEN",
            "GITHUB_REPO",
            "GITHUB_BRANCH",
            "URL_24H_FILE",
            "TIME_URL_FILES",
            "PAUSE_START_HOUR",
            "PAUSE_END_HOUR",
            "TIMEZONE",
            "REQUEST_TIMEOUT",
            "MAX_RETRIES",
            "SEND_SUMMARY",
            "SPACE_HOST",
            "RENDER_EXTERNAL_URL",
            "KOYEB_PUBLIC_DOMAIN",
            "WORKSPACE_DEV_DOMAIN",
            "CSB_BASE_PREVIEW_HOST",
            "CSB_SANDBOX_ID",
            "PORT",
        ] {
            std::env::remove_var(name);
        }
        for index in 1..10 {
            std::env::remove_var(format!("URL_{index}"));
            std::env::remove_var(format!("WEBSITE_{index}"));
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = Config::from_env();

        assert!(!config.telegram.is_configured());
        assert!(!config.github.is_configured());
        assert_eq!(config.github.branch, "main");
        assert_eq!(config.probe.timeout_ms, 30000);
        assert_eq!(config.probe.max_retries, 2);
        assert_eq!(config.pause, PauseWindow::new(1, 6));
        assert_eq!(config.timezone, chrono_tz::Asia::Hong_Kong);
        assert_eq!(config.always_on_file, "url.yaml");
        assert_eq!(
            config.time_gated_files,
            vec!["url1.yaml", "url2.yaml", "url3.yaml"]
        );
        assert!(config.static_always_on_urls.is_empty());
        assert!(config.static_time_gated_urls.is_empty());
        assert!(!config.send_summary);
    }

    #[test]
    #[serial]
    fn test_numbered_url_scanning_stops_at_gap() {
        clear_env();
        std::env::set_var("URL_1", "https://a.example/");
        std::env::set_var("URL_2", "https://b.example/");
        std::env::set_var("URL_4", "https://d.example/");
        std::env::set_var("WEBSITE_1", "https://night.example/");

        let config = Config::from_env();

        assert_eq!(
            config.static_always_on_urls,
            vec!["https://a.example/", "https://b.example/"]
        );
        assert_eq!(
            config.static_time_gated_urls,
            vec!["https://night.example/"]
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_hour_falls_back_to_default() {
        clear_env();
        std::env::set_var("PAUSE_START_HOUR", "7pm");
        std::env::set_var("PAUSE_END_HOUR", "25");

        let config = Config::from_env();

        assert_eq!(config.pause, PauseWindow::new(1, 6));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unknown_timezone_falls_back() {
        clear_env();
        std::env::set_var("TIMEZONE", "Not/AZone");

        let config = Config::from_env();
        assert_eq!(config.timezone, chrono_tz::Asia::Hong_Kong);

        std::env::set_var("TIMEZONE", "America/New_York");
        let config = Config::from_env();
        assert_eq!(config.timezone, chrono_tz::America::New_York);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_platform_urls_come_first() {
        clear_env();
        std::env::set_var("SPACE_HOST", "demo.hf.space");
        std::env::set_var("RENDER_EXTERNAL_URL", "https://demo.onrender.com");
        std::env::set_var("URL_1", "https://a.example/");

        let config = Config::from_env();

        assert_eq!(
            config.static_always_on_urls,
            vec![
                "https://demo.hf.space",
                "https://demo.onrender.com",
                "https://a.example/"
            ]
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_codesandbox_url_requires_all_parts() {
        clear_env();
        std::env::set_var("CSB_BASE_PREVIEW_HOST", "csb.app");

        let config = Config::from_env();
        assert!(config.static_always_on_urls.is_empty());

        std::env::set_var("CSB_SANDBOX_ID", "abc123");
        std::env::set_var("PORT", "8080");

        let config = Config::from_env();
        assert_eq!(config.static_always_on_urls, vec!["https://abc123-8080.csb.app"]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_malformed_repo_disables_remote_fetch() {
        clear_env();
        std::env::set_var("GITHUB_TOKEN", "ghp_test");
        std::env::set_var("GITHUB_REPO", "just-a-name");

        let config = Config::from_env();
        assert!(config.github.token.is_some());
        assert!(config.github.repo.is_none());
        assert!(!config.github.is_configured());

        std::env::set_var("GITHUB_REPO", "owner/repo");
        let config = Config::from_env();
        assert_eq!(config.github.repo.as_deref(), Some("owner/repo"));
        assert!(config.github.is_configured());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_time_url_files_parsing() {
        clear_env();
        std::env::set_var("TIME_URL_FILES", "a.yaml, b.yaml,,c.yaml");

        let config = Config::from_env();
        assert_eq!(config.time_gated_files, vec!["a.yaml", "b.yaml", "c.yaml"]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_send_summary_parsing() {
        clear_env();

        std::env::set_var("SEND_SUMMARY", "true");
        assert!(Config::from_env().send_summary);

        std::env::set_var("SEND_SUMMARY", "TRUE");
        assert!(Config::from_env().send_summary);

        std::env::set_var("SEND_SUMMARY", "yes");
        assert!(!Config::from_env().send_summary);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_request_timeout_and_retries_override() {
        clear_env();
        std::env::set_var("REQUEST_TIMEOUT", "5000");
        std::env::set_var("MAX_RETRIES", "0");

        let config = Config::from_env();
        assert_eq!(config.probe.timeout_ms, 5000);
        assert_eq!(config.probe.max_retries, 0);

        std::env::set_var("REQUEST_TIMEOUT", "not-a-number");
        let config = Config::from_env();
        assert_eq!(config.probe.timeout_ms, 30000);

        clear_env();
    }
}
