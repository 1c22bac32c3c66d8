/// 触发资源版本化的标记属性（区分大小写）
pub const MARKER_ATTRS: &[&str] = &["rev", "md5", "REV", "MD5"];

/// 遍历时无条件进入的容器元素
pub const CONTAINER_ELEMENTS: &[&str] = &["html", "head", "body"];

/// 可以携带标记属性的元素
pub const REVISIONED_ELEMENTS: &[&str] = &["link", "script"];

/// 解析前需要剔除的换行字符
pub const LINE_BREAKS: &[char] = &['\r', '\n'];

/// 检查属性名是否为标记属性
pub fn is_marker_attr(attr_name: &str) -> bool {
    MARKER_ATTRS.contains(&attr_name)
}

/// 检查元素是否为容器元素（标签名不区分大小写）
pub fn is_container(element_name: &str) -> bool {
    CONTAINER_ELEMENTS
        .iter()
        .any(|name| name.eq_ignore_ascii_case(element_name))
}

/// 检查元素是否可以被版本化
pub fn is_revisioned_element(element_name: &str) -> bool {
    REVISIONED_ELEMENTS
        .iter()
        .any(|name| name.eq_ignore_ascii_case(element_name))
}

/// 剔除所有换行字符
pub fn strip_line_breaks(html: &str) -> String {
    html.replace(LINE_BREAKS, "")
}
