//! HTML解析和处理模块
//!
//! - `utils`: 标记属性等常量
//! - `tag`: 起始标签的无损解析与改写
//! - `dom`: 解析与文档结构
//! - `walker`: 被标记元素的遍历、收集与收尾
//! - `serializer`: 序列化功能

pub mod dom;
pub mod serializer;
pub mod tag;
pub mod utils;
pub mod walker;

pub use dom::{has_marker_attr, html_to_dom, remove_marker_attrs, Document, Element};
pub use serializer::serialize_document;
pub use tag::StartTag;
pub use utils::{is_marker_attr, strip_line_breaks, MARKER_ATTRS};
pub use walker::{collect_marked_elements, strip_marker_attrs, walk, MarkedElement};
