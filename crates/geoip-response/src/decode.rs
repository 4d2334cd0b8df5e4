//! Body decoding.
//!
//! The default [`InflateDecoder`] inflates gzip and zlib bodies with
//! `flate2` and caps the decoded size so a small compressed reply cannot
//! expand without bound.

use std::borrow::Cow;
use std::io::Read;

use flate2::read::{GzDecoder, ZlibDecoder};
use geoip_core::config::DEFAULT_MAX_DECOMPRESSED_SIZE;
use geoip_core::DecoderConfig;

use crate::encoding::EncodingStrategy;
use crate::error::DecodeError;

/// Turns an encoded body into plain bytes. An empty result is an error for
/// every strategy, Identity included.
pub trait PayloadDecoder {
    fn decode<'a>(
        &self,
        strategy: EncodingStrategy,
        body: &'a [u8],
    ) -> Result<Cow<'a, [u8]>, DecodeError>;
}

/// `flate2`-backed decoder with an output ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflateDecoder {
    max_size: usize,
}

impl InflateDecoder {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self::new(config.max_decompressed_size)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Read at most one byte past the ceiling, so an oversized stream is
    /// detected without inflating all of it.
    fn inflate(&self, reader: impl Read) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::new();
        reader
            .take((self.max_size as u64).saturating_add(1))
            .read_to_end(&mut out)
            .map_err(|e| DecodeError::Corrupt(e.to_string()))?;

        if out.len() > self.max_size {
            return Err(DecodeError::TooLarge {
                limit: self.max_size,
            });
        }
        if out.is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(out)
    }
}

impl Default for InflateDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DECOMPRESSED_SIZE)
    }
}

impl PayloadDecoder for InflateDecoder {
    fn decode<'a>(
        &self,
        strategy: EncodingStrategy,
        body: &'a [u8],
    ) -> Result<Cow<'a, [u8]>, DecodeError> {
        match strategy {
            EncodingStrategy::Identity if body.is_empty() => Err(DecodeError::Empty),
            EncodingStrategy::Identity => Ok(Cow::Borrowed(body)),
            EncodingStrategy::Gzip => self.inflate(GzDecoder::new(body)).map(Cow::Owned),
            EncodingStrategy::Zlib => self.inflate(ZlibDecoder::new(body)).map(Cow::Owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;

    use super::*;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn identity_borrows_body() {
        let decoder = InflateDecoder::default();
        let out = decoder.decode(EncodingStrategy::Identity, b"abc").unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, b"abc");
    }

    #[test]
    fn identity_rejects_empty_body() {
        let decoder = InflateDecoder::default();
        assert_eq!(
            decoder.decode(EncodingStrategy::Identity, b""),
            Err(DecodeError::Empty)
        );
    }

    #[test]
    fn gzip_body() {
        let decoder = InflateDecoder::default();
        let data = gzip(b"Hello, GZIP!");
        let out = decoder.decode(EncodingStrategy::Gzip, &data).unwrap();
        assert_eq!(&*out, b"Hello, GZIP!");
    }

    #[test]
    fn zlib_body() {
        let decoder = InflateDecoder::default();
        let data = zlib(b"Hello, zlib!");
        let out = decoder.decode(EncodingStrategy::Zlib, &data).unwrap();
        assert_eq!(&*out, b"Hello, zlib!");
    }

    #[test]
    fn gzip_rejects_zlib_framing() {
        let decoder = InflateDecoder::default();
        let err = decoder
            .decode(EncodingStrategy::Gzip, &zlib(b"Hello"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Corrupt(_)));
    }

    #[test]
    fn garbage_is_corrupt() {
        let decoder = InflateDecoder::default();
        for strategy in [EncodingStrategy::Gzip, EncodingStrategy::Zlib] {
            let err = decoder.decode(strategy, b"not compressed at all").unwrap_err();
            assert!(matches!(err, DecodeError::Corrupt(_)), "{strategy:?}: {err}");
        }
    }

    #[test]
    fn empty_output_is_an_error() {
        let decoder = InflateDecoder::default();
        assert_eq!(
            decoder.decode(EncodingStrategy::Gzip, &gzip(b"")),
            Err(DecodeError::Empty)
        );
        assert_eq!(
            decoder.decode(EncodingStrategy::Zlib, &zlib(b"")),
            Err(DecodeError::Empty)
        );
    }

    #[test]
    fn output_ceiling() {
        let decoder = InflateDecoder::new(1024);
        let bomb = gzip(&vec![b'a'; 64 * 1024]);
        assert!(bomb.len() < 1024);
        assert_eq!(
            decoder.decode(EncodingStrategy::Gzip, &bomb),
            Err(DecodeError::TooLarge { limit: 1024 })
        );

        let exact = gzip(&vec![b'a'; 1024]);
        assert_eq!(decoder.decode(EncodingStrategy::Gzip, &exact).unwrap().len(), 1024);
    }

    #[test]
    fn unbounded_ceiling() {
        let decoder = InflateDecoder::new(usize::MAX);
        let data = zlib(b"Hello, zlib!");
        let out = decoder.decode(EncodingStrategy::Zlib, &data).unwrap();
        assert_eq!(&*out, b"Hello, zlib!");
    }

    #[test]
    fn from_config_uses_ceiling() {
        let config = DecoderConfig {
            max_decompressed_size: 10,
            ..DecoderConfig::default()
        };
        assert_eq!(InflateDecoder::from_config(&config).max_size(), 10);
    }
}
