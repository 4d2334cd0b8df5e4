//! geoip-response — decoder for raw GeoIP lookup replies.
//!
//! Turns the bytes returned by the lookup service into a typed
//! [`ParseResult`]. Fetching the bytes is the caller's job; this crate
//! performs no I/O.
//!
//! # Pipeline
//!
//! ```text
//! ResponseParser::parse(raw)
//!   ├── header::split()           → header block / body at "\r\n\r\n"
//!   ├── ResponseHeader::parse()   → status line + case-insensitive fields
//!   ├── EncodingStrategy::resolve → Identity | Gzip | Zlib from Content-Encoding
//!   ├── PayloadDecoder::decode()  → inflated body, size-capped
//!   └── records::records()        → one Record per well-formed line
//! ```
//!
//! # Failure reporting
//!
//! Parsing never fails outright. Framing problems and non-success statuses
//! end in [`ParseResult::NoBody`]; unknown encodings and inflate failures end
//! in [`ParseResult::EncodingError`], whose status code is the synthetic
//! [`STATUS_CONTENT_ENCODING_ERR`]. Malformed body lines are skipped.

pub mod decode;
pub mod encoding;
pub mod error;
pub mod header;
pub mod records;
pub mod response;

pub use decode::{InflateDecoder, PayloadDecoder};
pub use encoding::EncodingStrategy;
pub use error::{DecodeError, ResponseError, STATUS_CONTENT_ENCODING_ERR};
pub use header::ResponseHeader;
pub use records::parse_records;
pub use response::{parse_geoip, ParseResult, ResponseParser};

pub use geoip_core::{DecoderConfig, GeoIp, Record};
