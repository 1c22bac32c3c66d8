//! 配置管理器
//!
//! 配置按以下顺序叠加，后者覆盖前者：
//!
//! 1. 默认值
//! 2. 配置文件（显式指定，或搜索路径中第一个存在的文件）
//! 3. 环境变量（`ASSETREV_*`，可由 `.env` 文件提供）
//!
//! 命令行参数在此之后由调用方覆盖。

use std::path::Path;

use crate::core::{RevisionError, RevisionOptions, RevisionResult};
use crate::env::{revision, EnvVar};

/// 配置文件搜索路径
pub const CONFIG_PATHS: &[&str] = &[
    "assetrev.toml",
    ".assetrev.toml",
    "~/.config/assetrev/config.toml",
];

/// 依次尝试加载的环境变量文件，只加载第一个存在的
pub const ENV_FILES: &[&str] = &[".env.local", ".env"];

/// 简化的配置管理器
pub struct ConfigManager {
    options: RevisionOptions,
}

impl ConfigManager {
    /// 加载、叠加并验证配置
    pub fn load(config_path: Option<&Path>) -> RevisionResult<Self> {
        Self::load_dotenv();

        let mut options = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::find_config()?,
        };
        Self::apply_env_overrides(&mut options)?;
        options.validate()?;

        Ok(ConfigManager { options })
    }

    pub fn into_options(self) -> RevisionOptions {
        self.options
    }

    fn find_config() -> RevisionResult<RevisionOptions> {
        for path in CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let path = Path::new(expanded_path.as_ref());
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(RevisionOptions::default())
    }

    /// 从指定文件加载配置；`.toml` 按 TOML 解析，其余按 JSON 解析
    pub fn load_from_file(path: &Path) -> RevisionResult<RevisionOptions> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RevisionError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        tracing::info!("loaded config file {}", path.display());

        if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content).map_err(|e| {
                RevisionError::Config(format!("failed to parse {}: {}", path.display(), e))
            })
        } else {
            serde_json::from_str(&content).map_err(|e| {
                RevisionError::Config(format!("failed to parse {}: {}", path.display(), e))
            })
        }
    }

    /// 应用环境变量覆盖；设置了但无效的变量视为配置错误
    pub fn apply_env_overrides(options: &mut RevisionOptions) -> RevisionResult<()> {
        if let Some(filename) = revision::Filename::lookup()? {
            options.filename = filename;
        }

        if let Some(server_ip) = revision::ServerIp::lookup()? {
            tracing::info!("environment overrides proxy host: {}", server_ip);
            options.server_ip = Some(server_ip);
        }

        if let Some(port) = revision::Port::lookup()? {
            options.port = port;
        }

        if let Some(timeout) = revision::Timeout::lookup()? {
            options.timeout = timeout;
        }

        if let Some(hash) = revision::Hash::lookup()? {
            options.hash = hash;
        }

        if let Some(base_url) = revision::BaseUrl::lookup()? {
            options.base_url = Some(base_url);
        }

        Ok(())
    }

    fn load_dotenv() {
        for env_file in ENV_FILES {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("loaded environment file {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &Path) -> RevisionResult<()> {
        let content = toml::to_string_pretty(&RevisionOptions::default())
            .map_err(|e| RevisionError::Config(format!("failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| {
            RevisionError::Config(format!("failed to write {}: {}", path.display(), e))
        })
    }
}
