//! Codec configuration: strict YAML, validated before a `Codec` is built.

pub mod schema;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::codec::Codec;
use crate::error::{ProtoError, Result};

pub use schema::{CodecConfig, DecodeLimits};

/// Read and validate a codec config file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<CodecConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| ProtoError::Io(format!("read codec config {} failed: {e}", path.display())))?;
    load_from_str(&text)
}

/// Parse a codec config. Unknown keys and out-of-range limits are `Config` errors.
pub fn load_from_str(text: &str) -> Result<CodecConfig> {
    let cfg: CodecConfig = serde_yaml::from_str(text)
        .map_err(|e| ProtoError::Config(format!("invalid codec yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Codec {
    /// Build a codec from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let cfg = load_from_str(text)?;
        debug!(
            bool_trailer = cfg.bool_trailer,
            max_depth = cfg.limits.max_depth,
            max_container_len = cfg.limits.max_container_len,
            "codec configured"
        );
        Ok(Codec::new(cfg))
    }

    /// Build a codec from a YAML file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ProtoError::Io(format!("read codec config {} failed: {e}", path.display())))?;
        Self::from_yaml(&text)
    }
}
