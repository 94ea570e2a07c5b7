//! 配置管理模块
//!
//! 提供环境变量解析和配置验证功能

pub mod env;
pub mod types;

// 重新导出主要类型
pub use types::{validate_config, Config, GithubConfig, ProbeConfig, TelegramConfig};
