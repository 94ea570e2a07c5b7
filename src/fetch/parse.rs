//! URL清单文本解析
//!
//! 将远程清单文件的文本内容解析为URL列表

use tracing::warn;

/// 解析清单文本为URL列表
///
/// 按行拆分并修剪空白，跳过空行和以 `#` 开头的注释行，
/// 丢弃无法通过绝对URL校验的行（记录警告，不中断）。
///
/// # 参数
/// * `content` - 清单文件的文本内容
///
/// # 返回
/// * `Vec<String>` - 校验通过的URL列表，保持文件内顺序
pub fn parse_url_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match reqwest::Url::parse(line) {
            Ok(_) => Some(line.to_string()),
            Err(e) => {
                warn!("忽略无效URL行: {} ({})", line, e);
                None
            }
        })
        .collect()
}
