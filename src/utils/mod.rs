//! # 工具模块
//!
//! - `url` - 资源地址规范化、路径拆分、公共地址解析
//! - `hash` - 内容摘要
//! - `template` - 文件名模板

pub mod hash;
pub mod template;
pub mod url;

// Re-export commonly used items for convenience
pub use hash::{short_hash, HashFunction};
pub use template::{render, DEFAULT_FILENAME_TEMPLATE};
pub use url::{file_name_and_ext, normalize_asset_url, resolve_public_url, Url};
