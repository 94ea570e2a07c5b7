//! Keep Vitals - 部署保活服务
//!
//! 这是一个用Rust编写的URL保活工具，通过定时访问部署地址防止托管平台休眠，支持：
//! - 从GitHub仓库远程获取URL清单（三级回退策略）
//! - 随机化浏览器身份的HTTP探测
//! - 按时区的暂停时段控制
//! - Telegram通知集成
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod notification;
pub mod probe;
pub mod scheduler;
pub mod web;

// 重新导出主要类型
pub use config::Config;
pub use error::KeepVitalsError;
pub use probe::{ProbeResult, Prober};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
