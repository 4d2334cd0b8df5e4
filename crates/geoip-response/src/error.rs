//! Error types for reply decoding.

use thiserror::Error;

/// Synthetic status reported for content-encoding failures. Lies outside the
/// range of real protocol statuses.
pub const STATUS_CONTENT_ENCODING_ERR: u16 = 601;

/// Why a reply did not yield records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("response has no header/body separator")]
    MissingSeparator,

    #[error("malformed status line '{0}'")]
    MalformedStatusLine(String),

    #[error("unexpected status {code} {message}")]
    UnexpectedStatus { code: u16, message: String },

    #[error("Unknown content encoding '{0}'")]
    UnsupportedEncoding(String),

    #[error("Content decoding using method '{encoding}' failed: {source}")]
    Decode {
        encoding: String,
        source: DecodeError,
    },
}

impl ResponseError {
    /// Status code this error is reported under, if any.
    ///
    /// Both encoding failures share [`STATUS_CONTENT_ENCODING_ERR`]. Framing
    /// failures have no status at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::MissingSeparator | Self::MalformedStatusLine(_) => None,
            Self::UnexpectedStatus { code, .. } => Some(*code),
            Self::UnsupportedEncoding(_) | Self::Decode { .. } => {
                Some(STATUS_CONTENT_ENCODING_ERR)
            }
        }
    }

    pub fn is_encoding_error(&self) -> bool {
        matches!(self, Self::UnsupportedEncoding(_) | Self::Decode { .. })
    }
}

/// Failure to turn an encoded body into plain bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{0}")]
    Corrupt(String),

    #[error("decoded body is empty")]
    Empty,

    #[error("decoded body exceeds {limit} bytes")]
    TooLarge { limit: usize },
}
