//! 清单来源trait定义
//!
//! 定义远程URL清单来源的统一接口和空实现

use crate::fetch::parse::parse_url_lines;
use async_trait::async_trait;

/// URL清单来源trait
///
/// 实现方负责获取文件文本；获取失败一律降级为空内容，
/// 不向调用方传播错误
#[async_trait]
pub trait UrlListSource: Send + Sync {
    /// 获取仓库内指定路径文件的文本内容
    ///
    /// # 参数
    /// * `path` - 仓库内文件路径
    ///
    /// # 返回
    /// * `String` - 文件文本内容，获取失败时为空字符串
    async fn fetch_file(&self, path: &str) -> String;

    /// 获取并解析指定路径的URL清单
    ///
    /// # 参数
    /// * `path` - 仓库内文件路径
    ///
    /// # 返回
    /// * `Vec<String>` - 解析出的URL列表
    async fn fetch_url_list(&self, path: &str) -> Vec<String> {
        parse_url_lines(&self.fetch_file(path).await)
    }
}

/// 空的清单来源实现（远程获取未配置时使用）
pub struct NoOpSource;

#[async_trait]
impl UrlListSource for NoOpSource {
    async fn fetch_file(&self, _path: &str) -> String {
        // 不执行任何操作
        String::new()
    }
}
