//! 通知发送器模块
//!
//! 定义通知发送的trait和空实现

use anyhow::Result;
use async_trait::async_trait;

/// 通知发送器trait
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 发送一条HTML格式的通知文本
    ///
    /// # 参数
    /// * `text` - 消息文本（HTML格式）
    ///
    /// # 返回
    /// * `Result<()>` - 发送结果
    async fn send(&self, text: &str) -> Result<()>;

    /// 测试通知通道
    ///
    /// # 返回
    /// * `Result<()>` - 测试结果
    async fn test_connection(&self) -> Result<()>;
}

/// 空的通知发送器实现（未配置通知渠道时使用）
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn send(&self, _text: &str) -> Result<()> {
        // 不执行任何操作
        Ok(())
    }

    async fn test_connection(&self) -> Result<()> {
        // 总是返回成功
        Ok(())
    }
}
