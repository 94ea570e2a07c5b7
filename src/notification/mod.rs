//! 通知模块
//!
//! 提供Telegram通知和消息构建功能

pub mod message;
pub mod sender;
pub mod telegram;

// 重新导出主要类型
pub use sender::{NoOpNotifier, Notifier};
pub use telegram::TelegramNotifier;
