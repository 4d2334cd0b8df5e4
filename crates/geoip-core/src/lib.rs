pub mod config;
pub mod types;

pub use config::{DecoderConfig, GeoIpConfig};
pub use types::*;
