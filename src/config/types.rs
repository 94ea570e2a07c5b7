//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use crate::scheduler::window::PauseWindow;
use chrono_tz::Tz;

/// 主配置结构，进程启动时从环境变量构建一次，之后不可变
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram通知配置
    pub telegram: TelegramConfig,
    /// GitHub仓库配置
    pub github: GithubConfig,
    /// 探测行为配置
    pub probe: ProbeConfig,
    /// 暂停时段
    pub pause: PauseWindow,
    /// 计算当前小时使用的时区
    pub timezone: Tz,
    /// 全天候URL清单文件路径（仓库内）
    pub always_on_file: String,
    /// 分时段URL清单文件路径列表（仓库内）
    pub time_gated_files: Vec<String>,
    /// 环境变量与托管平台提供的全天候URL
    pub static_always_on_urls: Vec<String>,
    /// 环境变量提供的分时段URL
    pub static_time_gated_urls: Vec<String>,
    /// 是否在每轮结束后发送汇总通知
    pub send_summary: bool,
}

/// Telegram通知配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    /// Bot token
    pub token: Option<String>,
    /// 接收消息的chat ID
    pub chat_id: Option<String>,
}

impl TelegramConfig {
    /// 判断通知是否已配置完整
    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }
}

/// GitHub仓库配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubConfig {
    /// 访问令牌
    pub token: Option<String>,
    /// 仓库坐标（owner/repo格式）
    pub repo: Option<String>,
    /// 分支名
    pub branch: String,
}

impl GithubConfig {
    /// 判断远程清单获取是否已配置
    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.repo.is_some()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            repo: None,
            branch: default_branch(),
        }
    }
}

/// 探测行为配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// 单次请求超时时间（毫秒）
    pub timeout_ms: u64,
    /// 首次尝试之外的最大重试次数
    pub max_retries: u32,
    /// 探测前随机延迟下界（毫秒，含）
    pub pre_delay_min_ms: u64,
    /// 探测前随机延迟上界（毫秒，不含）
    pub pre_delay_max_ms: u64,
    /// 重试前的固定等待时间（毫秒）
    pub retry_delay_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            pre_delay_min_ms: default_pre_delay_min_ms(),
            pre_delay_max_ms: default_pre_delay_max_ms(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

// 默认值函数
pub(crate) fn default_branch() -> String {
    "main".to_string()
}
pub(crate) fn default_always_on_file() -> String {
    "url.yaml".to_string()
}
pub(crate) fn default_time_gated_files() -> Vec<String> {
    vec![
        "url1.yaml".to_string(),
        "url2.yaml".to_string(),
        "url3.yaml".to_string(),
    ]
}
pub(crate) fn default_timeout_ms() -> u64 {
    30000
}
pub(crate) fn default_max_retries() -> u32 {
    2
}
pub(crate) fn default_pre_delay_min_ms() -> u64 {
    1000
}
pub(crate) fn default_pre_delay_max_ms() -> u64 {
    6000
}
pub(crate) fn default_retry_delay_ms() -> u64 {
    10000
}
pub(crate) fn default_timezone() -> Tz {
    chrono_tz::Asia::Hong_Kong
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.probe.timeout_ms == 0 {
        return Err("请求超时时间不能为0".to_string());
    }

    if config.probe.pre_delay_min_ms >= config.probe.pre_delay_max_ms {
        return Err(format!(
            "探测前延迟区间无效: [{}, {})",
            config.probe.pre_delay_min_ms, config.probe.pre_delay_max_ms
        ));
    }

    if config.pause.start_hour > 23 || config.pause.end_hour > 23 {
        return Err(format!(
            "暂停时段小时数超出范围: [{}, {})",
            config.pause.start_hour, config.pause.end_hour
        ));
    }

    if config.always_on_file.trim().is_empty() {
        return Err("全天候URL清单文件路径不能为空".to_string());
    }

    // 仓库坐标必须为 owner/repo 格式
    if let Some(ref repo) = config.github.repo {
        let mut parts = repo.splitn(2, '/');
        let owner = parts.next().unwrap_or("");
        let name = parts.next().unwrap_or("");
        if owner.is_empty() || name.is_empty() {
            return Err(format!("仓库坐标格式无效: {repo}"));
        }
    }

    Ok(())
}
