//! 拨测结果数据结构
//!
//! 定义单次保活拨测的结果记录

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 重试耗尽时记录的哨兵状态码
pub const SENTINEL_FAILURE_STATUS: u16 = 500;

/// 单次拨测结果
///
/// 产生后不再修改，`index` 保留提交顺序供汇总时排序。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// 结果ID
    pub id: Uuid,
    /// 提交顺序序号
    pub index: usize,
    /// 目标URL
    pub url: String,
    /// 最终HTTP状态码
    pub status: u16,
    /// 是否成功（状态码为200）
    pub success: bool,
    /// 拨测完成时间（配置时区的偏移）
    pub timestamp: DateTime<FixedOffset>,
    /// 错误信息（如果有）
    pub error_message: Option<String>,
    /// 实际发出的请求次数
    pub attempts: u32,
}

impl ProbeResult {
    /// 基于收到的HTTP响应创建拨测结果
    ///
    /// # 参数
    /// * `index` - 提交顺序序号
    /// * `url` - 目标URL
    /// * `status` - 最终HTTP状态码
    /// * `timestamp` - 拨测完成时间
    ///
    /// # 返回
    /// * `Self` - 拨测结果实例
    pub fn new(index: usize, url: String, status: u16, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            id: Uuid::new_v4(),
            index,
            url,
            status,
            success: status == 200,
            timestamp,
            error_message: None,
            attempts: 1,
        }
    }

    /// 创建重试耗尽的终端失败结果，状态码记为哨兵值
    pub fn exhausted(index: usize, url: String, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            id: Uuid::new_v4(),
            index,
            url,
            status: SENTINEL_FAILURE_STATUS,
            success: false,
            timestamp,
            error_message: None,
            attempts: 1,
        }
    }

    /// 设置错误信息
    pub fn with_error(mut self, error_message: String) -> Self {
        self.error_message = Some(error_message);
        self
    }

    /// 设置实际请求次数
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// 转换为JSON字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
