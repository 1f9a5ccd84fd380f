//! Query gateway: the request-handling contract behind every entry point

use std::sync::Arc;
use tracing::warn;
use url::form_urlencoded;

use super::models::QueryResult;
use super::resolver::{split_addresses, BatchResolver};
use super::shaper::{self, Payload};
use super::QueryError;
use crate::auth::SignatureVerifier;
use crate::geoip::GeoLookup;
use crate::localization::Localizer;

/// Query-string parameters of a lookup request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub ip: Option<String>,
    pub time: Option<String>,
    pub sign: Option<String>,
}

impl QueryParams {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            ..Default::default()
        }
    }

    pub fn signed(ip: impl Into<String>, time: impl Into<String>, sign: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            time: Some(time.into()),
            sign: Some(sign.into()),
        }
    }

    /// Parse a raw query string. Repeated keys keep their first value and
    /// unknown keys are ignored, so parsing never fails.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "ip" => &mut params.ip,
                "time" => &mut params.time,
                "sign" => &mut params.sign,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

#[derive(Clone)]
pub struct QueryGateway {
    resolver: BatchResolver,
    verifier: Option<SignatureVerifier>,
}

impl QueryGateway {
    pub fn new(
        provider: Arc<dyn GeoLookup>,
        localizer: Arc<Localizer>,
        verifier: Option<SignatureVerifier>,
    ) -> Self {
        Self {
            resolver: BatchResolver::new(provider, localizer),
            verifier,
        }
    }

    pub fn auth_enabled(&self) -> bool {
        self.verifier.is_some()
    }

    /// Validate, authorize, resolve and shape one request
    pub fn query(&self, params: &QueryParams) -> Result<Payload, QueryError> {
        let raw = params.ip.as_deref().unwrap_or("");
        if raw.is_empty() {
            return Err(QueryError::MissingAddress);
        }

        if let Some(verifier) = &self.verifier {
            let time = params.time.as_deref().unwrap_or("");
            let sign = params.sign.as_deref().unwrap_or("");
            if let Err(err) = verifier.verify(raw, time, sign) {
                warn!(ip = %raw, time = %time, error = %err, "Rejected query");
                return Err(err.into());
            }
        }

        shaper::shape(self.resolve(raw))
    }

    /// Resolve a raw comma-separated list without auth or shaping
    pub fn resolve(&self, raw: &str) -> Vec<QueryResult> {
        self.resolver.resolve_all(&split_addresses(raw))
    }

    /// One-shot mode: always the indented array form, whatever the batch size
    pub fn query_direct(&self, raw: &str) -> Result<String, QueryError> {
        if raw.is_empty() {
            return Err(QueryError::MissingAddress);
        }
        shaper::to_pretty_json(&self.resolve(raw))
    }
}
