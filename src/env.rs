//! 统一的环境变量管理系统
//!
//! 每个环境变量是一个实现了 `EnvVar` 的单元结构体，
//! 提供名称、默认值、说明和类型安全的解析。

use std::env;
use std::fmt;

use crate::utils::hash::HashFunction;
use crate::utils::template::DEFAULT_FILENAME_TEMPLATE;
use crate::utils::url::is_http_url;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    /// 未设置时使用的原始值，同样经过 `parse`
    const DEFAULT: Option<&'static str>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => match Self::DEFAULT {
                Some(default) => Self::parse(default),
                None => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Required environment variable not set".to_string(),
                }),
            },
        }
    }

    /// 只读取显式设置的值；未设置返回 `Ok(None)`，设置了但无效返回错误
    fn lookup() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "ASSETREV_LOG_LEVEL";
        const DEFAULT: Option<&'static str> = Some("info");
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<&'static str> = Some("");
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何非空值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 资源版本化相关环境变量
pub mod revision {
    use super::*;

    /// 文件名模板
    pub struct Filename;
    impl EnvVar<String> for Filename {
        const NAME: &'static str = "ASSETREV_FILENAME";
        const DEFAULT: Option<&'static str> = Some(DEFAULT_FILENAME_TEMPLATE);
        const DESCRIPTION: &'static str = "Filename template with {name}, {hash} and {ext}";

        fn parse(value: &str) -> EnvResult<String> {
            let template = value.trim();
            if template.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Template cannot be empty".to_string(),
                });
            }
            Ok(template.to_string())
        }
    }

    /// 代理服务器地址
    pub struct ServerIp;
    impl EnvVar<String> for ServerIp {
        const NAME: &'static str = "ASSETREV_SERVER_IP";
        const DEFAULT: Option<&'static str> = None;
        const DESCRIPTION: &'static str = "Proxy host every asset request is routed through";

        fn parse(value: &str) -> EnvResult<String> {
            let host = value.trim();
            if host.is_empty() || host.contains(char::is_whitespace) {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Must be a host name or IP address".to_string(),
                });
            }
            Ok(host.to_string())
        }
    }

    /// 代理端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "ASSETREV_PORT";
        const DEFAULT: Option<&'static str> = Some("80");
        const DESCRIPTION: &'static str = "Proxy port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }

            Ok(port)
        }
    }

    /// 单个请求的截止时间（毫秒）
    pub struct Timeout;
    impl EnvVar<u64> for Timeout {
        const NAME: &'static str = "ASSETREV_TIMEOUT";
        const DEFAULT: Option<&'static str> = Some("2000");
        const DESCRIPTION: &'static str = "Per-request deadline in milliseconds";

        fn parse(value: &str) -> EnvResult<u64> {
            parse_ranged_u64(value, Self::NAME, 1, 600_000)
        }
    }

    /// 摘要算法
    pub struct Hash;
    impl EnvVar<HashFunction> for Hash {
        const NAME: &'static str = "ASSETREV_HASH";
        const DEFAULT: Option<&'static str> = Some("md5");
        const DESCRIPTION: &'static str = "Content digest: md5, sha256, sha512, blake3";

        fn parse(value: &str) -> EnvResult<HashFunction> {
            value.parse().map_err(|message| EnvError {
                variable: Self::NAME.to_string(),
                message,
            })
        }
    }

    /// 相对资源地址的解析基准
    pub struct BaseUrl;
    impl EnvVar<String> for BaseUrl {
        const NAME: &'static str = "ASSETREV_BASE_URL";
        const DEFAULT: Option<&'static str> = None;
        const DESCRIPTION: &'static str = "Base URL for resolving relative asset URLs";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if is_http_url(url) {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Base URL must start with http:// or https://".to_string(),
                })
            }
        }
    }
}

/// 辅助函数
fn parse_ranged_u64(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<u64> {
    let num: u64 = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn env_doc_line<V: EnvVar<T>, T>() -> String {
    format!(
        "- `{}`: {} (default: {})\n",
        V::NAME,
        V::DESCRIPTION,
        V::DEFAULT.map_or("unset".to_string(), |default| format!("{default:?}"))
    )
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&env_doc_line::<core::LogLevel, _>());
    docs.push_str(&env_doc_line::<core::NoColor, _>());

    docs.push_str("\n## Revision Configuration\n\n");
    docs.push_str(&env_doc_line::<revision::Filename, _>());
    docs.push_str(&env_doc_line::<revision::ServerIp, _>());
    docs.push_str(&env_doc_line::<revision::Port, _>());
    docs.push_str(&env_doc_line::<revision::Timeout, _>());
    docs.push_str(&env_doc_line::<revision::Hash, _>());
    docs.push_str(&env_doc_line::<revision::BaseUrl, _>());

    docs
}
