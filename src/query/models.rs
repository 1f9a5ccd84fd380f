//! Data models for batch queries

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::geoip::LookupError;

/// Error taxonomy shared by per-item and request-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RequestMalformed,
    Unauthorized,
    InvalidAddress,
    LookupFailed,
    EncodingFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestMalformed => "request-malformed",
            Self::Unauthorized => "unauthorized",
            Self::InvalidAddress => "invalid-address",
            Self::LookupFailed => "lookup-failed",
            Self::EncodingFailed => "encoding-failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure recorded against a single address of a batch
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemError {
    #[error("invalid IP address")]
    InvalidAddress,

    #[error("lookup failed: {0}")]
    LookupFailed(#[from] LookupError),
}

impl ItemError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAddress => ErrorKind::InvalidAddress,
            Self::LookupFailed(_) => ErrorKind::LookupFailed,
        }
    }
}

impl Serialize for ItemError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Legacy status marker carried by successful results
pub const CODE_OK: &str = "0";

/// Geolocation answer for one requested address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    /// Address as supplied, trimmed
    pub ip: String,

    /// Localized country label
    pub country: String,

    /// Raw ISO country code, never localized
    pub country_code: String,

    /// Localized region label
    #[serde(rename = "province")]
    pub region: String,

    /// Localized city label
    pub city: String,

    /// `"0"` on success, empty on failure
    pub code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ItemError>,
}

impl QueryResult {
    pub fn failed(ip: impl Into<String>, error: ItemError) -> Self {
        Self {
            ip: ip.into(),
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serialization_has_no_error_key() {
        let result = QueryResult {
            ip: "1.1.1.1".to_string(),
            country: "Australia".to_string(),
            country_code: "AU".to_string(),
            region: "Queensland".to_string(),
            city: "Brisbane".to_string(),
            code: CODE_OK.to_string(),
            error: None,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "ip": "1.1.1.1",
                "country": "Australia",
                "country_code": "AU",
                "province": "Queensland",
                "city": "Brisbane",
                "code": "0",
            })
        );
    }

    #[test]
    fn test_failed_result_has_zero_labels() {
        let result = QueryResult::failed("", ItemError::InvalidAddress);
        assert!(result.is_error());
        assert_eq!(result.country, "");
        assert_eq!(result.country_code, "");
        assert_eq!(result.region, "");
        assert_eq!(result.city, "");
        assert_eq!(result.code, "");

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["error"], "invalid IP address");
    }

    #[test]
    fn test_lookup_failure_text_carries_cause() {
        let error = ItemError::from(LookupError::InvalidAddress("bogus".to_string()));
        assert_eq!(error.kind(), ErrorKind::LookupFailed);
        assert_eq!(error.to_string(), "lookup failed: invalid IP address: bogus");
    }

    #[test]
    fn test_error_kind_names() {
        assert_eq!(ErrorKind::RequestMalformed.as_str(), "request-malformed");
        assert_eq!(ErrorKind::InvalidAddress.to_string(), "invalid-address");
        assert_eq!(ItemError::InvalidAddress.kind(), ErrorKind::InvalidAddress);
    }
}
