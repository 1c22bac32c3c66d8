//! 起始标签的无损模型
//!
//! 只解析元素的起始标签（`<name attr=value ...>`）。每个属性保留它前面的空白、
//! 引号风格和原始写法，所以未改动的标签序列化后与源文本逐字节一致；
//! 改动过的属性沿用原来的引号。
//!
//! ```
//! use assetrev::parsers::html::StartTag;
//!
//! let (mut tag, len) = StartTag::parse("<script async src='/a.js' rev></script>").unwrap();
//! assert_eq!(len, 30);
//!
//! tag.set("src", "/static/a-0a286891.js");
//! tag.remove_where(|name| name == "rev");
//! assert_eq!(tag.to_string(), "<script async src='/static/a-0a286891.js'>");
//! ```

use std::fmt;

/// 起始标签中的一个属性
#[derive(Debug, Clone, PartialEq, Eq)]
struct TagAttribute {
    /// 属性名之前的原文：空白以及多余的 `/`
    leading: String,
    name: String,
    /// 属性名之后的原文，如 `="a.css"`；布尔属性为空
    rest: String,
    value: Option<String>,
}

/// 元素的起始标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    name: String,
    attrs: Vec<TagAttribute>,
    /// 最后一个属性之后的原文，如 `>`、` />`
    tail: String,
}

impl StartTag {
    /// 从 `<` 开始解析一个起始标签
    ///
    /// # 返回值
    ///
    /// 标签及其在源文本中占用的字节数；不是完整的起始标签时返回 `None`
    pub fn parse(source: &str) -> Option<(StartTag, usize)> {
        let bytes = source.as_bytes();
        if bytes.first() != Some(&b'<') {
            return None;
        }

        let name_end = scan_until(bytes, 1, |b| {
            b.is_ascii_whitespace() || b == b'/' || b == b'>'
        });
        if name_end == 1 {
            return None;
        }

        let name = source[1..name_end].to_string();
        let mut attrs = Vec::new();
        let mut pos = name_end;

        loop {
            let leading_start = pos;
            pos = scan_until(bytes, pos, |b| !(b.is_ascii_whitespace() || b == b'/'));

            match bytes.get(pos) {
                None => return None,
                Some(b'>') => {
                    let end = pos + 1;
                    let tail = source[leading_start..end].to_string();
                    return Some((StartTag { name, attrs, tail }, end));
                }
                Some(_) => {}
            }

            // 属性名的第一个字符可以是 `=`
            let name_start = pos;
            pos = scan_until(bytes, pos + 1, |b| {
                b.is_ascii_whitespace() || matches!(b, b'/' | b'>' | b'=')
            });
            let name_end = pos;

            let mut value = None;
            let equals = scan_until(bytes, pos, |b| !b.is_ascii_whitespace());
            if bytes.get(equals) == Some(&b'=') {
                let value_start = scan_until(bytes, equals + 1, |b| !b.is_ascii_whitespace());

                match bytes.get(value_start) {
                    None => return None,
                    Some(&quote) if quote == b'"' || quote == b'\'' => {
                        let close = scan_until(bytes, value_start + 1, |b| b == quote);
                        if close == bytes.len() {
                            return None;
                        }
                        value = Some(source[value_start + 1..close].to_string());
                        pos = close + 1;
                    }
                    Some(b'>') => {
                        value = Some(String::new());
                        pos = value_start;
                    }
                    Some(_) => {
                        let end = scan_until(bytes, value_start, |b| {
                            b.is_ascii_whitespace() || b == b'>'
                        });
                        value = Some(source[value_start..end].to_string());
                        pos = end;
                    }
                }
            }

            attrs.push(TagAttribute {
                leading: source[leading_start..name_start].to_string(),
                name: source[name_start..name_end].to_string(),
                rest: source[name_end..pos].to_string(),
                value,
            });
        }
    }

    /// 标签名，保持源文本中的大小写
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 按源文本顺序列出属性名
    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.iter().map(|attr| attr.name.as_str())
    }

    /// 属性值；属性名不区分大小写，布尔属性的值为空字符串
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_deref().unwrap_or(""))
    }

    /// 设置属性值
    ///
    /// 已有的同名属性全部改写并保留原来的引号风格，没有则追加在末尾。
    pub fn set(&mut self, name: &str, value: &str) {
        let mut found = false;

        for attr in self
            .attrs
            .iter_mut()
            .filter(|attr| attr.name.eq_ignore_ascii_case(name))
        {
            let quote = attr.quote();
            attr.rest = format!("={quote}{}{quote}", escape_attr_value(value, quote));
            attr.value = Some(value.to_string());
            found = true;
        }

        if !found {
            self.attrs.push(TagAttribute {
                leading: " ".to_string(),
                name: name.to_string(),
                rest: format!("=\"{}\"", escape_attr_value(value, '"')),
                value: Some(value.to_string()),
            });
        }
    }

    /// 删除名称满足条件的属性（连同它前面的空白），返回被删除的属性名
    pub fn remove_where<P>(&mut self, predicate: P) -> Vec<String>
    where
        P: Fn(&str) -> bool,
    {
        let mut removed = Vec::new();

        self.attrs.retain(|attr| {
            if predicate(&attr.name) {
                removed.push(attr.name.clone());
                false
            } else {
                true
            }
        });

        removed
    }
}

impl TagAttribute {
    fn quote(&self) -> char {
        match self.rest.trim_start().strip_prefix('=').map(str::trim_start) {
            Some(value) if value.starts_with('\'') => '\'',
            _ => '"',
        }
    }
}

impl fmt::Display for StartTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attr in &self.attrs {
            write!(f, "{}{}{}", attr.leading, attr.name, attr.rest)?;
        }
        write!(f, "{}", self.tail)
    }
}

fn scan_until<P>(bytes: &[u8], from: usize, stop: P) -> usize
where
    P: Fn(u8) -> bool,
{
    let from = from.min(bytes.len());
    bytes[from..]
        .iter()
        .position(|&b| stop(b))
        .map_or(bytes.len(), |offset| from + offset)
}

fn escape_attr_value(value: &str, quote: char) -> String {
    match quote {
        '\'' => value.replace('\'', "&#39;"),
        _ => value.replace('"', "&quot;"),
    }
}
