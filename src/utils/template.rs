//! 文件名模板
//!
//! 支持 `{name}`、`{hash}`、`{ext}` 三个占位符。占位符只有在取值非空时才会被替换，
//! 未知占位符或取值为空的占位符原样保留在结果中。

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::hash::short_hash;
use super::url::file_name_and_ext;

/// 未配置模板时使用的默认模板
pub const DEFAULT_FILENAME_TEMPLATE: &str = "{name}-{hash}.{ext}";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"))
}

/// 根据模板、资源地址和完整摘要生成文件名
///
/// ```
/// use assetrev::utils::template::render;
///
/// let file_name = render("{name}-{hash}.{ext}", "//cdn.test/app.css", "d41d8cd98f00b204");
/// assert_eq!(file_name, "app-d41d8cd9.css");
/// ```
pub fn render(template: &str, source_url: &str, hash: &str) -> String {
    let (name, ext) = file_name_and_ext(source_url);
    let hash = short_hash(hash);

    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let value = match &caps[1] {
                "name" => name.as_str(),
                "hash" => hash,
                "ext" => ext.as_str(),
                _ => "",
            };

            if value.is_empty() {
                caps[0].to_string()
            } else {
                value.to_string()
            }
        })
        .into_owned()
}
