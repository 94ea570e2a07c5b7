//! Telegram通知发送器模块
//!
//! 通过Bot API的sendMessage接口推送HTML消息

use crate::notification::sender::Notifier;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info};

/// Bot API默认地址
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram通知发送器
pub struct TelegramNotifier {
    /// HTTP客户端
    client: Client,
    /// Bot令牌
    token: String,
    /// 目标会话ID
    chat_id: String,
    /// Bot API基础地址
    api_base: String,
}

impl TelegramNotifier {
    /// 创建新的Telegram发送器
    ///
    /// # 参数
    /// * `token` - Bot令牌
    /// * `chat_id` - 目标会话ID
    ///
    /// # 返回
    /// * `Result<Self>` - 发送器实例
    pub fn new(token: String, chat_id: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("创建HTTP客户端失败")?;

        Ok(Self {
            client,
            token,
            chat_id,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// 覆盖Bot API基础地址（用于测试）
    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base;
        self
    }

    /// 构建sendMessage消息体
    fn build_message_body(&self, text: &str) -> Value {
        json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML"
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let body = self.build_message_body(text);

        debug!("发送Telegram通知 ({} 字符)", text.len());

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("发送Telegram消息失败")?;

        if response.status().is_success() {
            info!("Telegram消息发送成功");
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!("Telegram消息发送失败: {} - {}", status, text);
            Err(anyhow::anyhow!("Telegram消息发送失败: {}", status))
        }
    }

    async fn test_connection(&self) -> Result<()> {
        self.send("<b>Keep-alive Test:</b> notification channel is working")
            .await
    }
}
