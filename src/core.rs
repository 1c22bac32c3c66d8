use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::env::{core::NoColor, EnvError, EnvVar};
use crate::host::{BuildHost, GeneratedAsset};
use crate::network::fetcher::{FetchError, Fetcher};
use crate::parsers::html::{
    collect_marked_elements, html_to_dom, serialize_document, strip_line_breaks,
    strip_marker_attrs,
};
use crate::utils::hash::HashFunction;
use crate::utils::template::{render, DEFAULT_FILENAME_TEMPLATE};
use crate::utils::url::{is_http_url, resolve_public_url};

/// Errors that can occur while revisioning a document
///
/// Any of these aborts the whole run: the host receives the error and no
/// partially rewritten HTML.
#[derive(Error, Debug)]
pub enum RevisionError {
    /// Invalid options or an HTTP client that cannot be built; raised at setup
    #[error("configuration error: {0}")]
    Config(String),

    /// Network error, non-2xx status or deadline cancellation
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("invalid asset URL \"{0}\"")]
    InvalidUrl(String),

    #[error("marked element #{index} has neither href nor src")]
    MissingUrl { index: usize },

    /// The strip pass did not meet the elements the collect pass found
    #[error("document changed between passes at marked element #{index}")]
    TreeShapeChanged { index: usize },

    #[error("failed to parse document: {0}")]
    Parse(String),
}

impl From<EnvError> for RevisionError {
    fn from(error: EnvError) -> Self {
        RevisionError::Config(error.to_string())
    }
}

pub type RevisionResult<T> = Result<T, RevisionError>;

pub const DEFAULT_PROXY_PORT: u16 = 80;
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;
pub const MAX_TIMEOUT_MS: u64 = 600_000;

/// Configuration options for asset revisioning
///
/// Field names follow snake_case; the camelCase spellings (`serverIp`,
/// `baseUrl`) are accepted as aliases when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RevisionOptions {
    /// Filename template, see [`crate::utils::template`]
    pub filename: String,
    /// Proxy host; when set, every request goes through `server_ip:port`
    #[serde(alias = "serverIp", skip_serializing_if = "Option::is_none")]
    pub server_ip: Option<String>,
    pub port: u16,
    /// Per-request deadline in milliseconds
    pub timeout: u64,
    pub hash: HashFunction,
    /// Base for asset URLs that are neither absolute nor protocol-relative
    #[serde(alias = "baseUrl", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for RevisionOptions {
    fn default() -> Self {
        RevisionOptions {
            filename: DEFAULT_FILENAME_TEMPLATE.to_string(),
            server_ip: None,
            port: DEFAULT_PROXY_PORT,
            timeout: DEFAULT_TIMEOUT_MS,
            hash: HashFunction::default(),
            base_url: None,
        }
    }
}

impl RevisionOptions {
    pub fn validate(&self) -> RevisionResult<()> {
        if self.filename.trim().is_empty() {
            return Err(RevisionError::Config(
                "filename template cannot be empty".to_string(),
            ));
        }

        if self.timeout == 0 || self.timeout > MAX_TIMEOUT_MS {
            return Err(RevisionError::Config(format!(
                "timeout must be between 1 and {MAX_TIMEOUT_MS} ms, got {}",
                self.timeout
            )));
        }

        if let Some(server_ip) = &self.server_ip {
            if server_ip.trim().is_empty() {
                return Err(RevisionError::Config("server IP cannot be empty".to_string()));
            }
        }

        if self.port == 0 {
            return Err(RevisionError::Config("proxy port cannot be 0".to_string()));
        }

        if let Some(base_url) = &self.base_url {
            if !is_http_url(base_url) {
                return Err(RevisionError::Config(format!(
                    "base URL must start with http:// or https://, got \"{base_url}\""
                )));
            }
        }

        Ok(())
    }

    /// Proxy URL built from `server_ip` and `port`
    pub fn proxy_url(&self) -> Option<String> {
        self.server_ip.as_deref().map(|server_ip| {
            let server_ip = server_ip.trim();
            // 裸 IPv6 地址需要方括号
            if server_ip.contains(':') && !server_ip.starts_with('[') {
                format!("http://[{server_ip}]:{}", self.port)
            } else {
                format!("http://{server_ip}:{}", self.port)
            }
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

/// The data the host hands to the plugin when an HTML document is emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlEmission {
    pub html: String,
    pub output_name: String,
}

/// Asset revisioning plugin
///
/// Created once per build; setup fails fast on invalid options or an HTTP
/// client that cannot be built, before any document is processed. Each HTML
/// emission is one independent run with no state shared between runs.
pub struct AssetRevisionPlugin {
    options: RevisionOptions,
    fetcher: Fetcher,
}

impl AssetRevisionPlugin {
    pub const NAME: &'static str = "AssetRevisionPlugin";

    pub fn new(options: RevisionOptions) -> RevisionResult<Self> {
        options.validate()?;
        let fetcher = Fetcher::new(&options)?;

        Ok(AssetRevisionPlugin { options, fetcher })
    }

    /// Emission hook: returns the emission with its HTML rewritten, or the error
    pub async fn before_emit(
        &self,
        mut data: HtmlEmission,
        host: &mut dyn BuildHost,
    ) -> RevisionResult<HtmlEmission> {
        match self.process(&data.html, host).await {
            Ok(html) => {
                data.html = html;
                Ok(data)
            }
            Err(e) => {
                warn!("{}: {} failed: {}", Self::NAME, data.output_name, e);
                Err(e)
            }
        }
    }

    /// Revisions every marked asset of `html` and returns the rewritten document
    ///
    /// 1. 解析：剔除换行后构建文档树
    /// 2. 收集：第一次遍历，按顺序收集被标记的元素
    /// 3. 抓取：并发抓取所有资源，任一失败则整体失败
    /// 4. 改写：计算摘要、生成文件名、登记资源、改写 href / src
    /// 5. 收尾：第二次遍历，删除标记属性
    /// 6. 序列化
    ///
    /// 抓取发生在任何修改之前，所以抓取失败时不会登记资源，也不会改写属性。
    pub async fn process(&self, html: &str, host: &mut dyn BuildHost) -> RevisionResult<String> {
        let public_path = host.public_path().to_string();

        let source = strip_line_breaks(html);
        let document = html_to_dom(&source)?;

        let elements = collect_marked_elements(&document);
        let urls = elements
            .iter()
            .map(|element| element.require_url().map(str::to_string))
            .collect::<RevisionResult<Vec<String>>>()?;
        debug!("found {} marked element(s)", elements.len());

        let contents = self.fetcher.fetch_all(&urls).await?;

        for (element, content) in elements.iter().zip(contents) {
            let digest = self.options.hash.digest_hex(content.as_bytes());
            let file_name = render(&self.options.filename, &urls[element.index], &digest);
            let public_url = resolve_public_url(&public_path, &file_name);

            debug!("{} -> {}", urls[element.index], public_url);
            host.emit_asset(&file_name, GeneratedAsset::new(content));
            element.rewrite_url(&document, &public_url)?;
        }

        strip_marker_attrs(&document, &elements)?;

        if !elements.is_empty() {
            info!("revisioned {} asset(s)", elements.len());
        }

        Ok(serialize_document(&document))
    }
}

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Prints an error message to stderr
pub fn print_error_message(msg: &str) {
    if NoColor::get_or_default(false) {
        eprintln!("{msg}");
    } else {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    }
}

/// Prints an info message to stdout
pub fn print_info_message(msg: &str) {
    println!("{msg}");
}
