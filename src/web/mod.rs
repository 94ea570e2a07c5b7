//! Web确认端点模块
//!
//! 托管平台的入站探测会访问本服务，返回固定确认文本

pub mod server;

pub use server::AckServer;
