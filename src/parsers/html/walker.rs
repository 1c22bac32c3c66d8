//! DOM遍历器模块
//!
//! 这个模块负责在文档树中定位带有标记属性的 `<link>` / `<script>` 元素。
//!
//! # 遍历规则
//!
//! - 深度优先、从左到右，只访问元素节点
//! - 无条件进入 `html`、`head`、`body` 三种容器，容器本身不会被收集
//! - 其他元素即使包含被标记的后代也不会进入
//! - 每命中一个元素，计数器加一；计数器作为返回值传回调用方
//!
//! 计数器按值传递而不是共享可变状态，因此收集和收尾两次遍历可以
//! 在树结构不变的前提下确定性地组合。
//!
//! # 使用示例
//!
//! ```rust
//! use assetrev::parsers::html::{html_to_dom, walk};
//!
//! let document = html_to_dom(r#"<html><head><link href="a.css" rev></head></html>"#).unwrap();
//! let count = walk(0, &document, document.roots(), &mut |_element, _index| None);
//! assert_eq!(count, 1);
//! ```

use tl::NodeHandle;

use crate::core::{RevisionError, RevisionResult};

use super::dom::{has_marker_attr, remove_marker_attrs, Document, Element};
use super::tag::StartTag;
use super::utils::{is_container, is_revisioned_element};

/// 会被改写为新地址的属性
pub const URL_ATTRS: &[&str] = &["href", "src"];

/// 遍历 `parent` 中的节点，对每个被标记的元素调用 `visitor`
///
/// `visitor` 收到 `(元素, 当前计数)`；若返回 `Some(新起始标签)`，
/// 则原位替换该元素的起始标签。
///
/// # 返回值
///
/// 遍历结束后的计数器值
pub fn walk<F>(counter: usize, document: &Document, parent: &[NodeHandle], visitor: &mut F) -> usize
where
    F: FnMut(&Element, usize) -> Option<StartTag>,
{
    let mut counter = counter;

    for handle in parent {
        let Some(element) = document.element(*handle) else {
            continue;
        };

        if is_container(element.name()) {
            if !element.children().is_empty() {
                counter = walk(counter, document, element.children(), visitor);
            }
        } else if is_revisioned_element(element.name()) && has_marker_attr(&element.start_tag) {
            let index = counter;
            counter += 1;

            if let Some(replacement) = visitor(&element, index) {
                document.replace_start_tag(&element, replacement);
            }
        }
    }

    counter
}

/// 被标记的元素
///
/// `index` 是发现顺序，也是与抓取结果对应的唯一键；
/// `element` 记录元素在源文本中的位置，用于第二次遍历时核对身份。
#[derive(Clone)]
pub struct MarkedElement {
    pub index: usize,
    pub element: Element,
    pub url: Option<String>,
}

impl MarkedElement {
    fn new(element: &Element, index: usize) -> Self {
        // href 优先，其次 src
        let url = non_empty_attr(&element.start_tag, "href")
            .or_else(|| non_empty_attr(&element.start_tag, "src"))
            .map(str::to_string);

        MarkedElement {
            index,
            element: element.clone(),
            url,
        }
    }

    /// 资源地址；元素既无 href 也无 src 时报错
    pub fn require_url(&self) -> RevisionResult<&str> {
        self.url.as_deref().ok_or(RevisionError::MissingUrl { index: self.index })
    }

    /// 把所有非空的 href / src 改写为新地址
    pub fn rewrite_url(&self, document: &Document, public_url: &str) -> RevisionResult<()> {
        let mut tag = document
            .start_tag_at(self.element.offset)
            .ok_or(RevisionError::TreeShapeChanged { index: self.index })?;

        for attr_name in URL_ATTRS {
            if non_empty_attr(&tag, attr_name).is_some() {
                tag.set(attr_name, public_url);
            }
        }

        document.replace_start_tag(&self.element, tag);
        Ok(())
    }
}

fn non_empty_attr<'t>(tag: &'t StartTag, name: &str) -> Option<&'t str> {
    tag.get(name).filter(|value| !value.is_empty())
}

/// 第一次遍历：按发现顺序收集所有被标记的元素
pub fn collect_marked_elements(document: &Document) -> Vec<MarkedElement> {
    let mut elements = Vec::new();

    walk(0, document, document.roots(), &mut |element, index| {
        elements.push(MarkedElement::new(element, index));
        None
    });

    elements
}

/// 第二次遍历：删除标记属性
///
/// 每个位置上的元素必须与收集时处于同一位置，数量也必须一致，
/// 否则说明两次遍历之间树结构发生了变化。
pub fn strip_marker_attrs(document: &Document, elements: &[MarkedElement]) -> RevisionResult<()> {
    let mut diverged_at: Option<usize> = None;

    let count = walk(0, document, document.roots(), &mut |element, index| {
        match elements.get(index) {
            Some(marked) if marked.element.offset == element.offset => {
                let mut tag = element.start_tag.clone();
                remove_marker_attrs(&mut tag);
                Some(tag)
            }
            _ => {
                diverged_at.get_or_insert(index);
                None
            }
        }
    });

    if let Some(index) = diverged_at {
        return Err(RevisionError::TreeShapeChanged { index });
    }

    if count != elements.len() {
        return Err(RevisionError::TreeShapeChanged { index: count });
    }

    Ok(())
}
