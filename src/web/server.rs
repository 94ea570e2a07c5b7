//! Web确认服务器实现
//!
//! 提供一个极简HTTP端点，对任何路径与方法都返回固定确认文本，
//! 供托管平台的入站探测确认进程存活

use crate::error::Result;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 对任何请求返回的确认文本
const ACK_BODY: &str = "Worker is running!";

/// Web确认服务器
pub struct AckServer {
    /// 监听地址
    listen_addr: SocketAddr,
    /// 关闭信号接收器
    shutdown_rx: Option<broadcast::Receiver<()>>,
}

impl AckServer {
    /// 创建新的确认服务器
    ///
    /// # 参数
    /// * `listen_addr` - 监听地址
    /// * `shutdown_rx` - 关闭信号接收器
    ///
    /// # 返回
    /// * `Self` - 服务器实例
    pub fn new(listen_addr: SocketAddr, shutdown_rx: broadcast::Receiver<()>) -> Self {
        Self {
            listen_addr,
            shutdown_rx: Some(shutdown_rx),
        }
    }

    /// 构建路由，所有路径与方法统一返回确认文本
    pub fn router() -> Router {
        Router::new()
            .route("/", get(ack))
            .fallback(ack)
            .layer(TraceLayer::new_for_http())
    }

    /// 启动服务器并阻塞至收到关闭信号
    pub async fn start(&mut self) -> Result<()> {
        let mut shutdown_rx = self
            .shutdown_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("关闭信号接收器已被使用"))?;

        let listener = tokio::net::TcpListener::bind(self.listen_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("确认服务器已启动: http://{}", local_addr);

        axum::serve(listener, Self::router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("接收到关闭信号，正在关闭确认服务器...");
            })
            .await?;

        info!("确认服务器已关闭");
        Ok(())
    }
}

/// 确认处理函数
async fn ack() -> &'static str {
    ACK_BODY
}
