//! 暂停时段定义
//!
//! 分时段URL在每日固定时段内暂停拨测

/// 每日暂停时段，半开区间 [start_hour, end_hour)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseWindow {
    /// 暂停开始小时（含）
    pub start_hour: u32,
    /// 暂停结束小时（不含）
    pub end_hour: u32,
}

impl PauseWindow {
    /// 创建暂停时段
    ///
    /// # 参数
    /// * `start_hour` - 暂停开始小时（含）
    /// * `end_hour` - 暂停结束小时（不含）
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// 判断给定小时是否落在暂停时段内
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }
}

impl Default for PauseWindow {
    fn default() -> Self {
        Self {
            start_hour: 1,
            end_hour: 6,
        }
    }
}
