//! IP geolocation lookup
//!
//! The query pipeline never touches a database format directly. It talks to a
//! [`GeoLookup`] implementation which resolves one address at a time into a
//! [`GeoRecord`] of raw (unlocalized) labels.

pub mod maxmind;

use std::net::IpAddr;
use thiserror::Error;

pub use maxmind::MaxMindProvider;

/// Fields a [`GeoRecord`] can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoField {
    CountryCode,
    Region,
    City,
}

/// Raw geolocation labels for a single address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoRecord {
    /// ISO country code (e.g., "US", "CN")
    pub country_code: Option<String>,

    /// Region/state/province
    pub region: Option<String>,

    /// City name
    pub city: Option<String>,
}

impl GeoRecord {
    /// Read a field, `None` if the database has no value for it
    pub fn get_string(&self, field: GeoField) -> Option<&str> {
        match field {
            GeoField::CountryCode => self.country_code.as_deref(),
            GeoField::Region => self.region.as_deref(),
            GeoField::City => self.city.as_deref(),
        }
    }

    /// Read a field, falling back to an empty string
    pub fn get_string_or_empty(&self, field: GeoField) -> &str {
        self.get_string(field).unwrap_or("")
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("no record found for {0}")]
    NotFound(IpAddr),

    #[error("database error: {0}")]
    Backend(String),
}

/// Single-address geolocation lookup.
///
/// Implementations are shared read-only across all in-flight requests.
pub trait GeoLookup: Send + Sync {
    fn lookup(&self, address: &str) -> Result<GeoRecord, LookupError>;
}

/// Parse a textual address the way every provider expects it
pub fn parse_address(address: &str) -> Result<IpAddr, LookupError> {
    address
        .parse::<IpAddr>()
        .map_err(|_| LookupError::InvalidAddress(address.to_string()))
}
