pub use url::Url;

use crate::core::{RevisionError, RevisionResult};

/// 把资源地址规范化为可以直接请求的绝对地址
///
/// - `//host/path` 补全为 `http://host/path`
/// - `http://` / `https://` 原样使用
/// - 其他地址相对于 `base_url` 解析；没有 `base_url` 时报错
pub fn normalize_asset_url(raw_url: &str, base_url: Option<&Url>) -> RevisionResult<Url> {
    let raw_url = raw_url.trim();

    let parsed = if raw_url.starts_with("//") {
        Url::parse(&format!("http:{raw_url}"))
    } else if is_http_url(raw_url) {
        Url::parse(raw_url)
    } else if let Some(base_url) = base_url {
        base_url.join(raw_url)
    } else {
        return Err(RevisionError::InvalidUrl(raw_url.to_string()));
    };

    parsed.map_err(|_| RevisionError::InvalidUrl(raw_url.to_string()))
}

/// 是否以 `http://` 或 `https://` 开头
pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// 取出地址的路径部分，忽略 query 和 fragment
pub fn url_path(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let without_suffix = &url[..end];

    // 跳过 scheme 和 authority
    match without_suffix.find("//") {
        Some(start) if start == 0 || without_suffix[..start].ends_with(':') => {
            let rest = &without_suffix[start + 2..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        _ => without_suffix,
    }
}

/// 从地址的路径中拆出文件名（不含扩展名）和扩展名（不含点）
///
/// ```
/// use assetrev::utils::url::file_name_and_ext;
///
/// assert_eq!(
///     file_name_and_ext("//cdn.test/css/app.min.css?v=3"),
///     ("app.min".to_string(), "css".to_string())
/// );
/// ```
pub fn file_name_and_ext(url: &str) -> (String, String) {
    let path = url_path(url).trim_end_matches('/');
    let base = path.rsplit('/').next().unwrap_or("");

    match base.rfind('.') {
        Some(dot) if dot > 0 => (base[..dot].to_string(), base[dot + 1..].to_string()),
        _ => (base.to_string(), String::new()),
    }
}

/// 用公共路径解析出资源的对外地址
///
/// 公共路径缺少结尾的 `/` 时会补上，空路径视为 `/`。
pub fn resolve_public_url(public_path: &str, file_name: &str) -> String {
    let base = if public_path.ends_with('/') {
        public_path.to_string()
    } else {
        format!("{public_path}/")
    };

    match Url::parse(&base).and_then(|base_url| base_url.join(file_name)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => format!("{base}{file_name}"),
    }
}
