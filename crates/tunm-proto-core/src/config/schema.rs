use serde::Deserialize;

use crate::error::{ProtoError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    pub version: u32,

    /// Legacy 3-byte bool layout `[tag, b, tag]`, as emitted by the C++ encoder.
    /// Enable it to read or write data exchanged with C++ peers; the default
    /// 2-byte `[tag, b]` matches the python, JS and .NET encoders.
    #[serde(default)]
    pub bool_trailer: bool,

    #[serde(default)]
    pub limits: DecodeLimits,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            version: 1,
            bool_trailer: false,
            limits: DecodeLimits::default(),
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ProtoError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.limits.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecodeLimits {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_max_container_len")]
    pub max_container_len: usize,

    #[serde(default = "default_max_bytes_len")]
    pub max_bytes_len: usize,

    #[serde(default = "default_max_str_table")]
    pub max_str_table: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_container_len: default_max_container_len(),
            max_bytes_len: default_max_bytes_len(),
            max_str_table: default_max_str_table(),
        }
    }
}

impl DecodeLimits {
    pub fn validate(&self) -> Result<()> {
        if !(1..=1024).contains(&self.max_depth) {
            return Err(ProtoError::Config(
                "limits.max_depth must be between 1 and 1024".into(),
            ));
        }
        if self.max_container_len == 0 {
            return Err(ProtoError::Config(
                "limits.max_container_len must be positive".into(),
            ));
        }
        if self.max_bytes_len == 0 {
            return Err(ProtoError::Config(
                "limits.max_bytes_len must be positive".into(),
            ));
        }
        if self.max_str_table == 0 {
            return Err(ProtoError::Config(
                "limits.max_str_table must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_depth() -> usize {
    64
}
fn default_max_container_len() -> usize {
    1 << 20
}
fn default_max_bytes_len() -> usize {
    16 * 1024 * 1024
}
fn default_max_str_table() -> usize {
    65_536
}
