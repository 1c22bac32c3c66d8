//! # assetrev
//!
//! 构建期的 HTML 后处理工具：找出带有 `rev` / `md5` 标记的 `<link>` 与 `<script>`，
//! 抓取它们引用的资源，按内容摘要重命名后登记到构建输出，并把标签地址改写为新文件名。
//!
//! ## 模块组织
//!
//! - `core` - 处理流程、选项和错误类型
//! - `config` - 配置文件和环境变量叠加
//! - `env` - 类型安全的环境变量
//! - `host` - 宿主构建工具接口和内存实现
//! - `network` - 资源抓取
//! - `parsers` - HTML 解析、遍历和序列化
//! - `utils` - 地址处理、摘要和文件名模板
//!
//! ## 示例
//!
//! ```no_run
//! use assetrev::{AssetRevisionPlugin, BuildOutput, RevisionOptions};
//!
//! # async fn run() -> Result<(), assetrev::RevisionError> {
//! let plugin = AssetRevisionPlugin::new(RevisionOptions::default())?;
//! let mut output = BuildOutput::new("/static/");
//!
//! let html = plugin
//!     .process(r#"<link rel="stylesheet" href="//cdn.test/app.css" rev>"#, &mut output)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod env;
pub mod host;
pub mod network;
pub mod parsers;
pub mod utils;

// Re-export commonly used items for convenience
pub use crate::config::ConfigManager;
pub use crate::core::{
    AssetRevisionPlugin, HtmlEmission, RevisionError, RevisionOptions, RevisionResult,
};
pub use crate::host::{BuildHost, BuildOutput, GeneratedAsset};
pub use crate::network::{FetchError, Fetcher};
pub use crate::utils::HashFunction;
