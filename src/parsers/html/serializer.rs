use super::dom::Document;

/// 序列化文档
///
/// 以源文本为准，只把被替换过的起始标签拼接进去，其余字节原样输出。
pub fn serialize_document(document: &Document) -> String {
    let source = document.source();
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    for (offset, original_len, tag) in document.edits() {
        output.push_str(&source[cursor..offset]);
        output.push_str(&tag.to_string());
        cursor = offset + original_len;
    }

    output.push_str(&source[cursor..]);
    output
}
