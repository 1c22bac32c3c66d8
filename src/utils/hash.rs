use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use md5::Md5;
use sha2::{Digest, Sha256, Sha512};

/// 文件名中保留的摘要长度
pub const SHORT_HASH_LEN: usize = 8;

/// 内容摘要算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFunction {
    #[default]
    Md5,
    Sha256,
    Sha512,
    Blake3,
}

impl HashFunction {
    pub const ALL: [HashFunction; 4] = [Self::Md5, Self::Sha256, Self::Sha512, Self::Blake3];

    pub fn name(&self) -> &'static str {
        match self {
            HashFunction::Md5 => "md5",
            HashFunction::Sha256 => "sha256",
            HashFunction::Sha512 => "sha512",
            HashFunction::Blake3 => "blake3",
        }
    }

    /// 计算完整摘要，输出小写十六进制
    pub fn digest_hex(&self, data: &[u8]) -> String {
        match self {
            HashFunction::Md5 => format!("{:x}", Md5::digest(data)),
            HashFunction::Sha256 => format!("{:x}", Sha256::digest(data)),
            HashFunction::Sha512 => format!("{:x}", Sha512::digest(data)),
            HashFunction::Blake3 => blake3::hash(data).to_hex().to_string(),
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HashFunction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_lowercase();

        Self::ALL
            .into_iter()
            .find(|function| function.name() == value)
            .ok_or_else(|| format!("unknown hash function '{value}'. Use: md5, sha256, sha512, blake3"))
    }
}

/// 摘要的前 8 个字符
pub fn short_hash(digest: &str) -> &str {
    match digest.char_indices().nth(SHORT_HASH_LEN) {
        Some((end, _)) => &digest[..end],
        None => digest,
    }
}
