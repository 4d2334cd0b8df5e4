//! Reply assembly: framing → status check → decoding → records.

use std::borrow::Cow;

use geoip_core::{DecoderConfig, GeoIp, Record};
use tracing::{debug, warn};

use crate::decode::{InflateDecoder, PayloadDecoder};
use crate::encoding::{EncodingStrategy, CONTENT_ENCODING};
use crate::error::{ResponseError, STATUS_CONTENT_ENCODING_ERR};
use crate::header::{self, ResponseHeader};
use crate::records;

/// Terminal outcome of parsing one reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult<R> {
    /// Success status and a decodable body. `records` may be empty, and is
    /// when a reply without Content-Encoding has no body.
    Success {
        header: ResponseHeader,
        records: Vec<R>,
    },
    /// The body's Content-Encoding was unknown or could not be decoded.
    EncodingError {
        header: ResponseHeader,
        error: ResponseError,
    },
    /// No usable body: missing framing, bad status line, or a non-success
    /// status. Decoding was never attempted.
    NoBody {
        header: Option<ResponseHeader>,
        reason: ResponseError,
    },
}

impl<R> ParseResult<R> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Status code for this outcome.
    ///
    /// Encoding failures report [`STATUS_CONTENT_ENCODING_ERR`]; replies
    /// without a parsable status line report `0`.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success { header, .. } => header.status_code(),
            Self::EncodingError { error, .. } => {
                error.status_code().unwrap_or(STATUS_CONTENT_ENCODING_ERR)
            }
            Self::NoBody { header, .. } => header.as_ref().map_or(0, |h| h.status_code()),
        }
    }

    pub fn status_message(&self) -> String {
        match self {
            Self::Success { header, .. }
            | Self::NoBody {
                header: Some(header),
                ..
            } => header.status_message().to_string(),
            Self::EncodingError { error, .. } | Self::NoBody { reason: error, .. } => {
                error.to_string()
            }
        }
    }

    pub fn header(&self) -> Option<&ResponseHeader> {
        match self {
            Self::Success { header, .. } | Self::EncodingError { header, .. } => Some(header),
            Self::NoBody { header, .. } => header.as_ref(),
        }
    }

    /// Header field lookup, ignoring ASCII case.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.header()?.get(name)
    }

    pub fn error(&self) -> Option<&ResponseError> {
        match self {
            Self::Success { .. } => None,
            Self::EncodingError { error, .. } => Some(error),
            Self::NoBody { reason, .. } => Some(reason),
        }
    }

    /// Parsed records; empty unless the parse succeeded.
    pub fn records(&self) -> &[R] {
        match self {
            Self::Success { records, .. } => records,
            _ => &[],
        }
    }

    pub fn into_records(self) -> Vec<R> {
        match self {
            Self::Success { records, .. } => records,
            _ => Vec::new(),
        }
    }
}

/// Parses lookup replies. Holds no per-reply state, so one parser can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct ResponseParser<D = InflateDecoder> {
    config: DecoderConfig,
    decoder: D,
}

impl ResponseParser {
    pub fn new(config: DecoderConfig) -> Self {
        let decoder = InflateDecoder::from_config(&config);
        Self { config, decoder }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl<D: PayloadDecoder> ResponseParser<D> {
    /// Create a parser with a custom body decoder.
    pub fn with_decoder(config: DecoderConfig, decoder: D) -> Self {
        Self { config, decoder }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Parse one raw reply. Never fails; inspect the returned variant or
    /// [`ParseResult::status_code`].
    pub fn parse<R: Record>(&self, raw: &[u8]) -> ParseResult<R> {
        let Some((head, body)) = header::split(raw) else {
            debug!(len = raw.len(), "reply has no header/body separator");
            return ParseResult::NoBody {
                header: None,
                reason: ResponseError::MissingSeparator,
            };
        };

        let header = match ResponseHeader::parse(head) {
            Ok(header) => header,
            Err(reason) => {
                debug!(%reason, "reply header rejected");
                return ParseResult::NoBody {
                    header: None,
                    reason,
                };
            }
        };

        if header.status_code() != self.config.success_status {
            debug!(
                status = header.status_code(),
                reason = header.status_message(),
                "reply carries no records"
            );
            let reason = ResponseError::UnexpectedStatus {
                code: header.status_code(),
                message: header.status_message().to_string(),
            };
            return ParseResult::NoBody {
                header: Some(header),
                reason,
            };
        }

        let strategy = match EncodingStrategy::resolve(&header) {
            Ok(strategy) => strategy,
            Err(error) => {
                warn!(%error, "unsupported reply encoding");
                return ParseResult::EncodingError { header, error };
            }
        };

        let decoded = match strategy.map(|s| self.decoder.decode(s, body)) {
            None => Cow::Borrowed(body),
            Some(Ok(decoded)) => decoded,
            Some(Err(source)) => {
                let encoding = header.get(CONTENT_ENCODING).unwrap_or_default().to_string();
                let error = ResponseError::Decode { encoding, source };
                warn!(%error, compressed = body.len(), "reply body decoding failed");
                return ParseResult::EncodingError { header, error };
            }
        };

        let text = String::from_utf8_lossy(&decoded);
        let lines = text.split('\n').count();
        let records: Vec<R> = records::records(&text).collect();
        debug!(
            encoding = strategy.map_or("none", |s| s.label()),
            decoded = decoded.len(),
            records = records.len(),
            skipped = lines - records.len(),
            "parsed reply"
        );

        ParseResult::Success { header, records }
    }
}

/// Parse a GeoIP lookup reply with the default configuration.
pub fn parse_geoip(raw: &[u8]) -> ParseResult<GeoIp> {
    ResponseParser::new(DecoderConfig::default()).parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    /// Fails the test if any body reaches it.
    struct UnreachableDecoder;

    impl PayloadDecoder for UnreachableDecoder {
        fn decode<'a>(
            &self,
            strategy: EncodingStrategy,
            _body: &'a [u8],
        ) -> Result<Cow<'a, [u8]>, DecodeError> {
            panic!("decoder invoked with {strategy:?}");
        }
    }

    fn guarded() -> ResponseParser<UnreachableDecoder> {
        ResponseParser::with_decoder(DecoderConfig::default(), UnreachableDecoder)
    }

    #[test]
    fn plain_reply() {
        let raw = b"HTTP/1.1 200 OK\r\nServer: geoip\r\n\r\n1.2.3.4,unknown\r\n5.6.7.8,unknown\r\n";
        let result = parse_geoip(raw);
        assert!(result.is_success());
        assert_eq!(result.status_code(), 200);
        assert_eq!(result.status_message(), "OK");
        assert_eq!(result.header_value("server"), Some("geoip"));
        assert_eq!(result.records().len(), 2);
        assert!(result.error().is_none());
    }

    #[test]
    fn missing_separator() {
        let result = parse_geoip(b"HTTP/1.1 200 OK\r\n1.2.3.4,unknown");
        assert_eq!(result.status_code(), 0);
        assert!(result.header().is_none());
        assert!(result.records().is_empty());
        assert_eq!(result.error(), Some(&ResponseError::MissingSeparator));
    }

    #[test]
    fn malformed_status_line_is_no_body() {
        let result = guarded().parse::<GeoIp>(b"hello\r\n\r\n1.2.3.4,unknown");
        assert!(matches!(
            result,
            ParseResult::NoBody {
                header: None,
                reason: ResponseError::MalformedStatusLine(_)
            }
        ));
    }

    #[test]
    fn non_success_status_skips_decoding() {
        let raw = b"HTTP/1.1 503 Service Unavailable\r\nContent-Encoding: gzip\r\n\r\nxx";
        let result = guarded().parse::<GeoIp>(raw);
        assert_eq!(result.status_code(), 503);
        assert_eq!(result.status_message(), "Service Unavailable");
        assert!(result.records().is_empty());
        assert_eq!(result.header_value("Content-Encoding"), Some("gzip"));
    }

    #[test]
    fn unsupported_encoding_skips_decoding() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Encoding: bogus\r\n\r\n1.2.3.4,unknown";
        let result = guarded().parse::<GeoIp>(raw);
        assert_eq!(result.status_code(), STATUS_CONTENT_ENCODING_ERR);
        assert_eq!(result.status_message(), "Unknown content encoding 'bogus'");
        assert!(result.records().is_empty());
        // The real header stays available for diagnostics.
        assert_eq!(result.header().map(|h| h.status_code()), Some(200));
    }

    #[test]
    fn custom_success_status() {
        let config = DecoderConfig {
            success_status: 203,
            ..DecoderConfig::default()
        };
        let parser = ResponseParser::new(config);
        let ok = parser.parse::<GeoIp>(b"HTTP/1.1 203 Partial\r\n\r\n1.2.3.4,unknown");
        assert!(ok.is_success());
        let rejected = parser.parse::<GeoIp>(b"HTTP/1.1 200 OK\r\n\r\n1.2.3.4,unknown");
        assert!(!rejected.is_success());
    }

    #[test]
    fn empty_body_without_encoding_succeeds() {
        let result = guarded().parse::<GeoIp>(b"HTTP/1.1 200 OK\r\n\r\n");
        assert!(result.is_success());
        assert!(result.into_records().is_empty());
    }

    #[test]
    fn empty_body_with_explicit_text_plain_fails() {
        let result = parse_geoip(b"HTTP/1.1 200 OK\r\nContent-Encoding: text/plain\r\n\r\n");
        assert_eq!(result.status_code(), STATUS_CONTENT_ENCODING_ERR);
        assert_eq!(
            result.status_message(),
            "Content decoding using method 'text/plain' failed: decoded body is empty"
        );
    }
}
