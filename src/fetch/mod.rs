//! 远程清单获取模块
//!
//! 提供清单来源抽象、GitHub三级回退获取和清单文本解析

pub mod github;
pub mod parse;
pub mod source;

pub use github::GithubFileSource;
pub use parse::parse_url_lines;
pub use source::{NoOpSource, UrlListSource};
