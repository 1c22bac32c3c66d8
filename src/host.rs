//! # 构建宿主
//!
//! 宿主构建工具向处理流程提供两样东西：
//!
//! - 公共路径（`public_path`），每次运行读取一次
//! - 输出资源表，按文件名登记新生成的资源
//!
//! `BuildOutput` 是一个内存实现，命令行工具用它收集资源后再写入输出目录。

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// 改名后登记到构建输出中的资源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAsset {
    content: Vec<u8>,
}

impl GeneratedAsset {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        GeneratedAsset {
            content: content.into(),
        }
    }

    /// 资源内容
    pub fn source(&self) -> &[u8] {
        &self.content
    }

    /// 资源的字节长度
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// 宿主构建工具的接口
pub trait BuildHost {
    /// 构建产物对外提供服务的基础路径
    fn public_path(&self) -> &str;

    /// 按文件名登记一个生成的资源；同名资源会被覆盖
    fn emit_asset(&mut self, file_name: &str, asset: GeneratedAsset);
}

/// 内存中的构建输出
#[derive(Debug, Default)]
pub struct BuildOutput {
    public_path: String,
    assets: BTreeMap<String, GeneratedAsset>,
}

impl BuildOutput {
    pub fn new(public_path: impl Into<String>) -> Self {
        BuildOutput {
            public_path: public_path.into(),
            assets: BTreeMap::new(),
        }
    }

    pub fn assets(&self) -> &BTreeMap<String, GeneratedAsset> {
        &self.assets
    }

    pub fn get(&self, file_name: &str) -> Option<&GeneratedAsset> {
        self.assets.get(file_name)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// 把所有资源写入 `dir`，返回写入的文件路径
    ///
    /// 文件名中的 `/` 会生成子目录；绝对路径或包含 `..` 的文件名会被拒绝。
    pub fn write_to(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.assets.len());

        for (file_name, asset) in &self.assets {
            let relative = Path::new(file_name);
            if !relative
                .components()
                .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
            {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("refusing to write asset outside output directory: {file_name}"),
                ));
            }

            let path = dir.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, asset.source())?;
            written.push(path);
        }

        Ok(written)
    }
}

impl BuildHost for BuildOutput {
    fn public_path(&self) -> &str {
        &self.public_path
    }

    fn emit_asset(&mut self, file_name: &str, asset: GeneratedAsset) {
        self.assets.insert(file_name.to_string(), asset);
    }
}
