use std::cell::RefCell;
use std::collections::BTreeMap;

use tl::{Node, NodeHandle, ParserOptions, VDom};

use super::tag::StartTag;
use super::utils::is_marker_attr;
use crate::core::{RevisionError, RevisionResult};

/// 解析后的文档
///
/// 文档树由 `tl` 构建，只用来确定元素的嵌套关系和位置；不插入隐含的
/// `<head>` / `<body>`，也不改写源文本。对元素的修改以“替换起始标签”的形式
/// 记录下来，序列化时拼接回源文本，其余字节原样保留。
pub struct Document<'s> {
    source: &'s str,
    vdom: VDom<'s>,
    edits: RefCell<BTreeMap<usize, TagEdit>>,
}

struct TagEdit {
    original_len: usize,
    tag: StartTag,
}

/// 文档中的一个元素
#[derive(Clone)]
pub struct Element {
    /// 起始标签在源文本中的字节偏移，在同一文档内唯一
    pub offset: usize,
    /// 当前的起始标签，包含已记录的修改
    pub start_tag: StartTag,
    /// 源文本中起始标签的长度
    original_len: usize,
    children: Vec<NodeHandle>,
}

impl Element {
    pub fn name(&self) -> &str {
        self.start_tag.name()
    }

    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}

/// 将 HTML 字符串转换为文档
///
/// 换行的剔除由调用方在此之前完成，文档借用的就是最终的源文本。
pub fn html_to_dom(source: &str) -> RevisionResult<Document<'_>> {
    let vdom = tl::parse(source, ParserOptions::default())
        .map_err(|e| RevisionError::Parse(format!("{e:?}")))?;

    Ok(Document {
        source,
        vdom,
        edits: RefCell::new(BTreeMap::new()),
    })
}

impl<'s> Document<'s> {
    pub fn source(&self) -> &'s str {
        self.source
    }

    /// 顶层节点
    pub fn roots(&self) -> &[NodeHandle] {
        self.vdom.children()
    }

    /// 取出元素；文本、注释等非元素节点返回 `None`
    pub fn element(&self, handle: NodeHandle) -> Option<Element> {
        let Node::Tag(tag) = handle.get(self.vdom.parser())? else {
            return None;
        };

        let offset = self.offset_of(tag.raw().as_bytes())?;
        let (start_tag, original_len) = self.current_start_tag(offset)?;
        let children = tag.children().top().iter().copied().collect();

        Some(Element {
            offset,
            start_tag,
            original_len,
            children,
        })
    }

    /// 偏移处当前的起始标签
    pub fn start_tag_at(&self, offset: usize) -> Option<StartTag> {
        self.current_start_tag(offset).map(|(tag, _)| tag)
    }

    /// 替换元素的起始标签
    pub fn replace_start_tag(&self, element: &Element, tag: StartTag) {
        self.edits.borrow_mut().insert(
            element.offset,
            TagEdit {
                original_len: element.original_len,
                tag,
            },
        );
    }

    /// 按偏移顺序列出被替换的起始标签：`(偏移, 原长度, 新标签)`
    pub fn edits(&self) -> Vec<(usize, usize, StartTag)> {
        self.edits
            .borrow()
            .iter()
            .map(|(offset, edit)| (*offset, edit.original_len, edit.tag.clone()))
            .collect()
    }

    fn current_start_tag(&self, offset: usize) -> Option<(StartTag, usize)> {
        if let Some(edit) = self.edits.borrow().get(&offset) {
            return Some((edit.tag.clone(), edit.original_len));
        }

        StartTag::parse(self.source.get(offset..)?)
    }

    // tl 的节点借用源文本，据此换算出元素在源文本中的位置
    fn offset_of(&self, raw: &[u8]) -> Option<usize> {
        let start = (raw.as_ptr() as usize).checked_sub(self.source.as_ptr() as usize)?;
        if raw.is_empty() || start + raw.len() > self.source.len() {
            return None;
        }

        self.source.as_bytes()[..=start]
            .iter()
            .rposition(|&b| b == b'<')
    }
}

/// 是否存在任一标记属性（区分大小写）
pub fn has_marker_attr(tag: &StartTag) -> bool {
    tag.attr_names().any(is_marker_attr)
}

/// 删除起始标签上的全部标记属性，返回被删除的属性名
pub fn remove_marker_attrs(tag: &mut StartTag) -> Vec<String> {
    tag.remove_where(is_marker_attr)
}
