//! Shared error type for the tunm proto crates.

use thiserror::Error;

/// Failure classes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Truncated or malformed input. The buffer is marked invalid.
    Malformed,
    /// Data the format's own encoder never produces, or a Value used as the wrong variant.
    Contract,
    /// Configuration could not be loaded or validated.
    Config,
    /// Tooling I/O (file loaders).
    Io,
}

impl ErrorClass {
    /// String representation used in tooling output and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::Malformed => "MALFORMED",
            ErrorClass::Contract => "CONTRACT",
            ErrorClass::Config => "CONFIG",
            ErrorClass::Io => "IO",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ProtoError>;

/// Unified error type used by the codec and its tooling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtoError {
    #[error("buffer exhausted: need {need} bytes, {left} left")]
    Exhausted { need: usize, left: usize },
    #[error("buffer is invalid")]
    Invalid,
    #[error("string index {index} out of range (table has {len})")]
    StrIndexOutOfRange { index: u64, len: usize },
    #[error("string is not valid utf-8")]
    InvalidUtf8,
    #[error("nesting deeper than {0}")]
    DepthExceeded(usize),
    #[error("declared length {len} over limit {limit}")]
    LengthExceeded { len: u64, limit: usize },
    #[error("unknown type tag: {0}")]
    UnknownTag(u8),
    #[error("negative length: {0}")]
    NegativeLength(i64),
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("message body must be arr, found {0}")]
    BodyNotArray(&'static str),
    #[error("config: {0}")]
    Config(String),
    #[error("io: {0}")]
    Io(String),
}

impl ProtoError {
    /// Map the error onto its failure class.
    pub fn class(&self) -> ErrorClass {
        match self {
            ProtoError::Exhausted { .. }
            | ProtoError::Invalid
            | ProtoError::StrIndexOutOfRange { .. }
            | ProtoError::InvalidUtf8
            | ProtoError::DepthExceeded(_)
            | ProtoError::LengthExceeded { .. } => ErrorClass::Malformed,
            ProtoError::UnknownTag(_)
            | ProtoError::NegativeLength(_)
            | ProtoError::TypeMismatch { .. }
            | ProtoError::BodyNotArray(_) => ErrorClass::Contract,
            ProtoError::Config(_) => ErrorClass::Config,
            ProtoError::Io(_) => ErrorClass::Io,
        }
    }

    /// True for truncated/malformed input that callers treat as "decode failed".
    pub fn is_recoverable(&self) -> bool {
        self.class() == ErrorClass::Malformed
    }
}
