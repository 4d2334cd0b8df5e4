//! Record types shared across the GeoIP crates.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A value parsed from a single line of a decoded response body.
///
/// Lines for which `from_line` returns `None`, or whose record reports
/// `is_empty`, are dropped by the record parser without affecting the
/// remaining lines.
pub trait Record: Sized {
    /// Build a record from one line. The line has already had its trailing
    /// carriage return removed.
    fn from_line(line: &str) -> Option<Self>;

    /// Whether this record carries no usable data.
    fn is_empty(&self) -> bool {
        false
    }
}

/// Why a line could not be read as a [`GeoIp`] record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("empty line")]
    Blank,

    #[error("expected at least 6 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid ip address '{0}'")]
    InvalidAddress(String),

    #[error("invalid {field} '{value}'")]
    InvalidCoordinate { field: &'static str, value: String },
}

/// Geographic location attached to a resolved address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One GeoIP lookup result.
///
/// Wire format, one record per line:
///
/// ```text
/// 128.213.48.13,Troy,NY,US,42.7495,-73.5951
/// 10.0.0.1,unknown
/// ```
///
/// Fields past the sixth (the service appends a timestamp in some replies)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoIp {
    pub ip: IpAddr,
    /// `None` when the service reported the address as unknown.
    pub location: Option<Location>,
}

impl GeoIp {
    pub fn new(ip: IpAddr, location: Location) -> Self {
        Self {
            ip,
            location: Some(location),
        }
    }

    /// A record for an address the service could not place.
    pub fn unknown(ip: IpAddr) -> Self {
        Self { ip, location: None }
    }

    pub fn is_unknown(&self) -> bool {
        self.location.is_none()
    }

    pub fn city(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.city.as_str())
    }

    pub fn country(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.country.as_str())
    }

    /// `(latitude, longitude)` for located records.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.location.as_ref().map(|l| (l.latitude, l.longitude))
    }
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<f64, RecordError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RecordError::InvalidCoordinate {
            field,
            value: value.to_string(),
        })
}

impl FromStr for GeoIp {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RecordError::Blank);
        }

        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        let ip = |raw: &str| {
            raw.parse::<IpAddr>()
                .map_err(|_| RecordError::InvalidAddress(raw.to_string()))
        };

        if fields.len() == 2 && fields[1].eq_ignore_ascii_case("unknown") {
            return Ok(GeoIp::unknown(ip(fields[0])?));
        }
        if fields.len() < 6 {
            return Err(RecordError::FieldCount(fields.len()));
        }

        Ok(GeoIp::new(
            ip(fields[0])?,
            Location {
                city: fields[1].to_string(),
                state: fields[2].to_string(),
                country: fields[3].to_string(),
                latitude: parse_coordinate("latitude", fields[4])?,
                longitude: parse_coordinate("longitude", fields[5])?,
            },
        ))
    }
}

impl fmt::Display for GeoIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(l) => write!(
                f,
                "{},{},{},{},{},{}",
                self.ip, l.city, l.state, l.country, l.latitude, l.longitude
            ),
            None => write!(f, "{},unknown", self.ip),
        }
    }
}

impl Record for GeoIp {
    fn from_line(line: &str) -> Option<Self> {
        line.parse().ok()
    }
}
