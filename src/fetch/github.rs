//! GitHub清单文件获取
//!
//! 按固定顺序的三级回退策略从GitHub仓库获取清单文件：
//! 内容API → raw端点 → 树查找加blob下载

use crate::config::GithubConfig;
use crate::error::{FetchError, Result};
use crate::fetch::source::UrlListSource;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// GitHub API 默认地址
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// raw内容端点默认地址
const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";

/// 获取策略，按 [`STRATEGY_ORDER`] 中的声明顺序依次尝试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchStrategy {
    /// 内容API直接获取
    ContentsApi,
    /// raw端点获取
    Raw,
    /// 树查找后按blob标识获取
    Blob,
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStrategy::ContentsApi => write!(f, "contents-api"),
            FetchStrategy::Raw => write!(f, "raw"),
            FetchStrategy::Blob => write!(f, "blob"),
        }
    }
}

/// 回退策略顺序
const STRATEGY_ORDER: [FetchStrategy; 3] = [
    FetchStrategy::ContentsApi,
    FetchStrategy::Raw,
    FetchStrategy::Blob,
];

/// 仓库树响应
#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

/// 仓库树条目
#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    sha: String,
}

/// blob响应，content字段为带换行的base64文本
#[derive(Debug, Deserialize)]
struct BlobResponse {
    content: String,
}

/// GitHub清单文件获取器
pub struct GithubFileSource {
    /// HTTP客户端
    client: Client,
    /// 访问令牌
    token: String,
    /// 仓库所有者
    owner: String,
    /// 仓库名
    repo: String,
    /// 分支名
    branch: String,
    /// API基础地址
    api_base: String,
    /// raw端点基础地址
    raw_base: String,
}

impl GithubFileSource {
    /// 创建新的GitHub清单获取器
    ///
    /// # 参数
    /// * `token` - 访问令牌
    /// * `owner` - 仓库所有者
    /// * `repo` - 仓库名
    /// * `branch` - 分支名
    ///
    /// # 返回
    /// * `Result<Self>` - 获取器实例
    pub fn new(token: &str, owner: &str, repo: &str, branch: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(FetchError::RequestError)?;

        Ok(Self {
            client,
            token: token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            raw_base: DEFAULT_RAW_BASE.to_string(),
        })
    }

    /// 按配置创建获取器
    ///
    /// 令牌或仓库坐标缺失、坐标格式非法时返回 `None` 并记录日志，
    /// 调用方应降级为空清单来源。
    ///
    /// # 参数
    /// * `config` - GitHub仓库配置
    ///
    /// # 返回
    /// * `Result<Option<Self>>` - 配置完整时为获取器实例
    pub fn from_config(config: &GithubConfig) -> Result<Option<Self>> {
        let (token, repo) = match (&config.token, &config.repo) {
            (Some(token), Some(repo)) => (token, repo),
            _ => {
                info!("GitHub令牌或仓库坐标未配置，远程清单获取已禁用");
                return Ok(None);
            }
        };

        let (owner, name) = match repo.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => (owner, name),
            _ => {
                warn!("仓库坐标格式无效: {}，远程清单获取已禁用", repo);
                return Ok(None);
            }
        };

        Ok(Some(Self::new(token, owner, name, &config.branch)?))
    }

    /// 覆盖API与raw端点基础地址（用于测试）
    pub fn with_base_urls(mut self, api_base: String, raw_base: String) -> Self {
        self.api_base = api_base;
        self.raw_base = raw_base;
        self
    }

    /// 按指定策略获取文件内容
    async fn fetch_via_strategy(
        &self,
        strategy: FetchStrategy,
        path: &str,
    ) -> std::result::Result<String, FetchError> {
        match strategy {
            FetchStrategy::ContentsApi => self.fetch_via_contents_api(path).await,
            FetchStrategy::Raw => self.fetch_via_raw(path).await,
            FetchStrategy::Blob => self.fetch_via_blob(path).await,
        }
    }

    /// 策略一：内容API，请求raw媒体类型直接返回文本
    async fn fetch_via_contents_api(&self, path: &str) -> std::result::Result<String, FetchError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_base, self.owner, self.repo, path, self.branch
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3.raw")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::BadStatus {
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// 策略二：raw端点
    async fn fetch_via_raw(&self, path: &str) -> std::result::Result<String, FetchError> {
        let url = format!(
            "{}/{}/{}/{}/{}",
            self.raw_base, self.owner, self.repo, self.branch, path
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::BadStatus {
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// 策略三：在仓库树中定位文件的blob标识，再按标识下载并解码
    async fn fetch_via_blob(&self, path: &str) -> std::result::Result<String, FetchError> {
        let tree_url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, self.owner, self.repo, self.branch
        );

        let response = self
            .client
            .get(&tree_url)
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::BadStatus {
                status: response.status().as_u16(),
            });
        }

        let tree: TreeResponse = response.json().await?;
        let sha = tree
            .tree
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| entry.sha.clone())
            .ok_or_else(|| FetchError::FileNotInTree {
                path: path.to_string(),
            })?;

        let blob_url = format!(
            "{}/repos/{}/{}/git/blobs/{}",
            self.api_base, self.owner, self.repo, sha
        );

        let response = self
            .client
            .get(&blob_url)
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::BadStatus {
                status: response.status().as_u16(),
            });
        }

        let blob: BlobResponse = response.json().await?;
        decode_blob_content(&blob.content)
    }
}

#[async_trait]
impl UrlListSource for GithubFileSource {
    async fn fetch_file(&self, path: &str) -> String {
        for strategy in STRATEGY_ORDER {
            match self.fetch_via_strategy(strategy, path).await {
                Ok(content) => {
                    debug!(
                        "清单文件获取成功: {} (策略: {}, {} 字节)",
                        path,
                        strategy,
                        content.len()
                    );
                    return content;
                }
                Err(e) => {
                    warn!("清单获取策略 {} 失败: {} ({})", strategy, path, e);
                }
            }
        }

        warn!("所有获取策略均失败，返回空清单: {}", path);
        String::new()
    }
}

/// 解码blob接口返回的base64内容，接口会在内容中插入换行符
fn decode_blob_content(content: &str) -> std::result::Result<String, FetchError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| FetchError::DecodeError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| FetchError::DecodeError(e.to_string()))
}
