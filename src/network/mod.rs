//! # 网络模块
//!
//! - `fetcher` - 资源抓取、代理、截止时间取消

pub mod fetcher;

// Re-export commonly used items for convenience
pub use fetcher::{FetchError, Fetcher, CANCEL_MESSAGE};
