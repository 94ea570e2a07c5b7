//! 通知消息构建
//!
//! 构建保活事件的HTML通知文本，措辞与历史推送保持一致，
//! 下游的消息过滤规则依赖这些固定前缀

use chrono::{DateTime, FixedOffset};

/// 通知时间戳的展示格式
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// 格式化通知中的时间戳
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// 构建非200状态码的失败通知
///
/// # 参数
/// * `timestamp` - 拨测完成时间
/// * `url` - 目标URL
/// * `status` - 收到的HTTP状态码
///
/// # 返回
/// * `String` - HTML消息文本
pub fn status_failure_message(
    timestamp: &DateTime<FixedOffset>,
    url: &str,
    status: u16,
) -> String {
    format!(
        "<b>Keep-alive Log:</b> {}\n<b>Access Failed:</b> {}\n<b>Status Code:</b> {}",
        format_timestamp(timestamp),
        url,
        status
    )
}

/// 构建重试耗尽的错误通知
///
/// # 参数
/// * `timestamp` - 最后一次尝试的时间
/// * `url` - 目标URL
/// * `error` - 错误描述
///
/// # 返回
/// * `String` - HTML消息文本
pub fn error_failure_message(
    timestamp: &DateTime<FixedOffset>,
    url: &str,
    error: &str,
) -> String {
    format!(
        "<b>Keep-alive Log:</b> {}\n<b>Access Error:</b> {}\n<b>Error Message:</b> {}",
        format_timestamp(timestamp),
        url,
        error
    )
}

/// 构建周期汇总通知
///
/// # 参数
/// * `timestamp` - 周期开始时间
/// * `always_on_count` - 全天保活URL数量
/// * `time_gated_count` - 分时段保活URL数量
///
/// # 返回
/// * `String` - HTML消息文本
pub fn summary_message(
    timestamp: &DateTime<FixedOffset>,
    always_on_count: usize,
    time_gated_count: usize,
) -> String {
    format!(
        "<b>Keep-alive Summary:</b> {}\n<b>24-hour URLs:</b> {}\n<b>Time-specific URLs:</b> {}\n<b>Task completed</b>",
        format_timestamp(timestamp),
        always_on_count,
        time_gated_count
    )
}
