//! 保活调度模块
//!
//! 提供周期编排和暂停时段判定

pub mod orchestrator;
pub mod window;

// 重新导出主要类型
pub use orchestrator::{CycleReport, Orchestrator};
pub use window::PauseWindow;
