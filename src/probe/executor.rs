//! HTTP保活拨测器实现
//!
//! 以随机化的浏览器身份访问目标URL，带超时控制与固定间隔重试

use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};
use crate::notification::{message, Notifier};
use crate::probe::identity;
use crate::probe::result::ProbeResult;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use rand::Rng;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, warn};

/// 保活拨测器trait，定义拨测接口
#[async_trait]
pub trait Prober: Send + Sync {
    /// 对单个URL执行一次完整拨测（含重试）
    ///
    /// # 参数
    /// * `index` - 提交顺序序号
    /// * `url` - 目标URL
    ///
    /// # 返回
    /// * `ProbeResult` - 拨测结果，任何失败都折叠为结果而非错误
    async fn probe(&self, index: usize, url: &str) -> ProbeResult;

    /// 并发拨测一组URL
    ///
    /// # 参数
    /// * `urls` - 目标URL列表
    ///
    /// # 返回
    /// * `Vec<ProbeResult>` - 按提交顺序排序的结果列表
    async fn probe_batch(&self, urls: &[String]) -> Vec<ProbeResult> {
        let futures = urls
            .iter()
            .enumerate()
            .map(|(index, url)| self.probe(index, url));
        let mut results = futures::future::join_all(futures).await;
        results.sort_by_key(|result| result.index);
        results
    }
}

/// HTTP保活拨测器实现
pub struct HttpProber {
    /// HTTP客户端
    client: Client,
    /// 拨测参数
    config: ProbeConfig,
    /// 失败通知发送器
    notifier: Arc<dyn Notifier>,
    /// 结果时间戳使用的时区
    timezone: Tz,
}

impl HttpProber {
    /// 创建新的HTTP拨测器
    ///
    /// # 参数
    /// * `config` - 拨测参数
    /// * `notifier` - 失败通知发送器
    /// * `timezone` - 结果时间戳使用的时区
    ///
    /// # 返回
    /// * `Result<Self>` - 拨测器实例
    pub fn new(config: ProbeConfig, notifier: Arc<dyn Notifier>, timezone: Tz) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(ProbeError::ClientError)?;

        Ok(Self {
            client,
            config,
            notifier,
            timezone,
        })
    }

    /// 当前时刻在配置时区下的时间戳
    fn now_in_timezone(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.timezone).fixed_offset()
    }

    /// 拨测前的随机停顿，分散同一批次内的请求
    async fn random_pre_delay(&self) {
        let min = self.config.pre_delay_min_ms;
        let max = self.config.pre_delay_max_ms;
        let delay_ms = if max > min {
            rand::thread_rng().gen_range(min..max)
        } else {
            min
        };

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    /// 构建带浏览器特征头的GET请求
    ///
    /// User-Agent与转发IP头每次随机生成
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("User-Agent", identity::random_user_agent())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Connection", "keep-alive")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .header("X-Forwarded-For", identity::random_ip())
            .header("X-Real-IP", identity::random_ip())
            .header("Origin", "https://glitch.com")
            .header("Referer", "https://glitch.com/")
    }

    /// 执行单次请求（含拨测前随机停顿），返回HTTP状态码
    ///
    /// 超时与传输错误以错误描述返回，由调用方决定是否重试。
    async fn perform_request(&self, url: &str) -> std::result::Result<u16, String> {
        self.random_pre_delay().await;

        let request = self.build_request(url);
        let response_result =
            timeout(Duration::from_millis(self.config.timeout_ms), request.send()).await;

        match response_result {
            Ok(Ok(response)) => Ok(response.status().as_u16()),
            Ok(Err(e)) => Err(self.format_request_error(&e)),
            Err(_) => Err("Request timeout".to_string()),
        }
    }

    /// 发送失败通知，通知本身失败时只记录日志
    async fn notify_failure(&self, text: &str) {
        if let Err(e) = self.notifier.send(text).await {
            error!("失败通知发送失败: {}", e);
        }
    }

    /// 格式化请求错误信息，使其更加清晰易读
    fn format_request_error(&self, error: &reqwest::Error) -> String {
        if error.is_timeout() {
            "Request timeout".to_string()
        } else if error.is_connect() {
            "Connection refused".to_string()
        } else if error.is_request() {
            "Invalid request".to_string()
        } else if let Some(status) = error.status() {
            format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        } else {
            format!("Request failed: {}", error)
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, index: usize, url: &str) -> ProbeResult {
        let mut last_error = String::new();

        // 仅传输错误与超时触发重试，收到任何HTTP响应即为终态
        for attempt in 0..=self.config.max_retries {
            match self.perform_request(url).await {
                Ok(status) => {
                    let timestamp = self.now_in_timezone();

                    if status != 200 {
                        self.notify_failure(&message::status_failure_message(
                            &timestamp, url, status,
                        ))
                        .await;
                    }

                    return ProbeResult::new(index, url.to_string(), status, timestamp)
                        .with_attempts(attempt + 1);
                }
                Err(e) => {
                    warn!("拨测请求失败: {} (第{}次尝试, {})", url, attempt + 1, e);
                    last_error = e;

                    if attempt < self.config.max_retries {
                        tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms))
                            .await;
                    }
                }
            }
        }

        let timestamp = self.now_in_timezone();
        error!("拨测重试耗尽，记为终端失败: {}", url);

        self.notify_failure(&message::error_failure_message(&timestamp, url, &last_error))
            .await;

        ProbeResult::exhausted(index, url.to_string(), timestamp)
            .with_error(last_error)
            .with_attempts(self.config.max_retries + 1)
    }
}
