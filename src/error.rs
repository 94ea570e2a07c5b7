//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Keep Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum KeepVitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 远程清单获取相关错误
    #[error("清单获取错误: {0}")]
    Fetch(#[from] FetchError),

    /// 拨测相关错误
    #[error("拨测错误: {0}")]
    Probe(#[from] ProbeError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notification(#[from] NotifyError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 环境变量解析错误
    #[error("环境变量解析失败: {var}={value}")]
    ParseError { var: String, value: String },

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 监听地址无效
    #[error("监听地址无效: {addr}")]
    InvalidListenAddr { addr: String },
}

/// 远程清单获取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP请求错误
    #[error("HTTP请求失败: {0}")]
    RequestError(#[from] reqwest::Error),

    /// 响应状态码非成功
    #[error("响应状态码异常: {status}")]
    BadStatus { status: u16 },

    /// 仓库树中未找到目标文件
    #[error("仓库树中未找到文件: {path}")]
    FileNotInTree { path: String },

    /// blob内容解码失败
    #[error("blob内容解码失败: {0}")]
    DecodeError(String),
}

/// 拨测错误类型
#[derive(Error, Debug)]
pub enum ProbeError {
    /// HTTP客户端构建失败
    #[error("HTTP客户端构建失败: {0}")]
    ClientError(#[from] reqwest::Error),
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotifyError {
    /// 发送失败
    #[error("通知发送失败: {0}")]
    SendError(String),

    /// 通知接口返回异常状态
    #[error("通知接口返回异常状态: {status}")]
    BadStatus { status: u16 },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, KeepVitalsError>;
