//! 保活拨测模块
//!
//! 提供拨测执行、请求身份随机化和结果数据结构

pub mod executor;
pub mod identity;
pub mod result;

// 重新导出主要类型
pub use executor::{HttpProber, Prober};
pub use result::{ProbeResult, SENTINEL_FAILURE_STATUS};
