//! 资源抓取
//!
//! 每个资源地址发起一次 GET 请求，响应按文本读取。
//!
//! 超时是"响应截止时间"而不是建立连接的超时：整个请求（发送和读取响应体）
//! 与一个定时器赛跑，定时器先到时丢弃正在进行的请求。因此服务器即使已经
//! 接受连接但迟迟不返回，也会在截止时间到达时被取消。

use std::time::Duration;

use futures::future::try_join_all;
use reqwest::{Client, Proxy};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{RevisionError, RevisionOptions, RevisionResult};
use crate::utils::url::{normalize_asset_url, Url};

/// 截止时间到达时携带的取消信息
pub const CANCEL_MESSAGE: &str =
    "connection timeout! Please make sure your server IP address is accessible";

const DEFAULT_USER_AGENT: &str = concat!("assetrev/", env!("CARGO_PKG_VERSION"));

/// 单个请求的失败原因
#[derive(Error, Debug)]
pub enum FetchError {
    /// 网络错误或非 2xx 状态
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// 截止时间到达，请求被取消
    #[error("{0}")]
    Cancelled(String),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled(_))
    }
}

/// HTTP 抓取器
///
/// 客户端在创建时构建一次；配置了 `server_ip` 时所有请求都经由该代理，
/// 否则直接连接目标地址，并忽略环境变量中的代理设置。
pub struct Fetcher {
    client: Client,
    timeout: Duration,
    base_url: Option<Url>,
}

impl Fetcher {
    pub fn new(options: &RevisionOptions) -> RevisionResult<Self> {
        let mut builder = Client::builder().user_agent(DEFAULT_USER_AGENT);

        builder = match options.proxy_url() {
            Some(proxy_url) => {
                let proxy = Proxy::all(&proxy_url).map_err(|e| {
                    RevisionError::Config(format!("invalid proxy \"{proxy_url}\": {e}"))
                })?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| RevisionError::Config(format!("failed to build HTTP client: {e}")))?;

        let base_url = match options.base_url.as_deref() {
            Some(base_url) => Some(Url::parse(base_url).map_err(|e| {
                RevisionError::Config(format!("invalid base URL \"{base_url}\": {e}"))
            })?),
            None => None,
        };

        Ok(Fetcher {
            client,
            timeout: options.timeout(),
            base_url,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 抓取单个资源
    pub async fn fetch_one(&self, raw_url: &str) -> RevisionResult<String> {
        let url = normalize_asset_url(raw_url, self.base_url.as_ref())?;
        debug!("fetching {}", url);

        match self.request_text(url.clone()).await {
            Ok(text) => {
                debug!("fetched {} ({} bytes)", url, text.len());
                Ok(text)
            }
            Err(source) => {
                warn!("failed to fetch {}: {}", url, source);
                Err(RevisionError::Fetch {
                    url: url.to_string(),
                    source,
                })
            }
        }
    }

    /// 并发抓取所有资源
    ///
    /// 结果与输入顺序一致；任一请求失败（包括被取消）整体失败，
    /// 其余尚未完成的请求随之被丢弃。
    pub async fn fetch_all(&self, urls: &[String]) -> RevisionResult<Vec<String>> {
        try_join_all(urls.iter().map(|url| self.fetch_one(url))).await
    }

    async fn request_text(&self, url: Url) -> Result<String, FetchError> {
        let request = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            Ok::<String, reqwest::Error>(response.text().await?)
        };

        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(FetchError::Cancelled(CANCEL_MESSAGE.to_string())),
        }
    }
}
