//! GeoIP lookup backed by a MaxMind GeoLite2/GeoIP2 MMDB
//!
//! The database is memory-mapped once at startup and shared by every request.

use anyhow::{Context, Result};
use maxminddb::{geoip2, Mmap, Reader};
use std::net::IpAddr;
use std::path::Path;

use super::{parse_address, GeoLookup, GeoRecord, LookupError};

pub struct MaxMindProvider {
    reader: Reader<Mmap>,
}

impl MaxMindProvider {
    /// Open a City (or Country) database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = unsafe { Reader::open_mmap(path) }
            .with_context(|| format!("Failed to open GeoIP database at {}", path.display()))?;

        Ok(Self { reader })
    }

    fn lookup_ip(&self, ip: IpAddr) -> Result<GeoRecord, LookupError> {
        let result = self
            .reader
            .lookup(ip)
            .map_err(|e| LookupError::Backend(e.to_string()))?;

        // City databases are a superset of Country data, so try City first
        // and fall back to the country-only view.
        match result.decode::<geoip2::City>() {
            Ok(Some(city)) => return Ok(Self::extract_from_city(&city)),
            Ok(None) => return Err(LookupError::NotFound(ip)),
            Err(_) => {}
        }

        match result.decode::<geoip2::Country>() {
            Ok(Some(country)) => Ok(Self::extract_from_country(&country)),
            Ok(None) => Err(LookupError::NotFound(ip)),
            Err(e) => Err(LookupError::Backend(e.to_string())),
        }
    }

    fn extract_from_city(city: &geoip2::City) -> GeoRecord {
        GeoRecord {
            country_code: city.country.iso_code.map(|s| s.to_string()),
            region: city
                .subdivisions
                .first()
                .and_then(|subdivision| subdivision.names.english)
                .map(|s| s.to_string()),
            city: city.city.names.english.map(|s| s.to_string()),
        }
    }

    fn extract_from_country(country: &geoip2::Country) -> GeoRecord {
        GeoRecord {
            country_code: country.country.iso_code.map(|s| s.to_string()),
            ..Default::default()
        }
    }
}

impl GeoLookup for MaxMindProvider {
    fn lookup(&self, address: &str) -> Result<GeoRecord, LookupError> {
        let ip = parse_address(address)?;
        self.lookup_ip(ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lookups need a real MMDB file; only the open path is covered here.

    #[test]
    fn test_open_invalid_path() {
        let result = MaxMindProvider::open("/nonexistent/path.mmdb");
        assert!(result.is_err());
    }

    #[test]
    fn test_open_error_names_path() {
        let err = MaxMindProvider::open("/nonexistent/city.mmdb")
            .err()
            .expect("opening a missing file must fail");
        assert!(format!("{err}").contains("/nonexistent/city.mmdb"));
    }
}
