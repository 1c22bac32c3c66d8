//! # 解析器模块
//!
//! - `html` - HTML文档解析、被标记元素的遍历与改写、序列化

pub mod html;

// Re-export commonly used items for convenience
pub use html::{
    collect_marked_elements, html_to_dom, serialize_document, strip_marker_attrs, walk,
    MarkedElement,
};
