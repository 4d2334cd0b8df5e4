//! Content-Encoding resolution.

use crate::error::ResponseError;
use crate::header::ResponseHeader;

pub const CONTENT_ENCODING: &str = "Content-Encoding";

/// How the body bytes of a reply are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingStrategy {
    /// Body is sent as-is.
    Identity,
    /// gzip-framed DEFLATE.
    Gzip,
    /// zlib-framed DEFLATE.
    Zlib,
}

impl EncodingStrategy {
    /// Map a Content-Encoding token to a strategy. Matching is exact and
    /// case-sensitive.
    pub fn from_token(token: &str) -> Result<Self, ResponseError> {
        match token {
            "gzip" | "x-gzip" => Ok(Self::Gzip),
            "deflate" | "x-deflate" => Ok(Self::Zlib),
            "text/plain" => Ok(Self::Identity),
            other => Err(ResponseError::UnsupportedEncoding(other.to_string())),
        }
    }

    /// Strategy for a parsed header, or `None` when it has no
    /// Content-Encoding and the body is used without decoding.
    pub fn resolve(header: &ResponseHeader) -> Result<Option<Self>, ResponseError> {
        header
            .get(CONTENT_ENCODING)
            .map(Self::from_token)
            .transpose()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Gzip => "gzip",
            Self::Zlib => "deflate",
        }
    }
}
