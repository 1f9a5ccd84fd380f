//! Response shaping: one object for a single address, an array otherwise

use serde::Serialize;
use tracing::warn;

use super::models::QueryResult;
use super::QueryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Single(QueryResult),
    Batch(Vec<QueryResult>),
}

impl Payload {
    pub fn to_json(&self) -> Result<Vec<u8>, QueryError> {
        serde_json::to_vec(self).map_err(QueryError::Encoding)
    }
}

/// Shape a batch for the HTTP binding.
///
/// A lone failed result escalates to a request failure with a generic
/// message; its detail only reaches the log. Batches of any other size are
/// returned whole with per-item errors embedded.
pub fn shape(mut results: Vec<QueryResult>) -> Result<Payload, QueryError> {
    if results.len() != 1 {
        return Ok(Payload::Batch(results));
    }

    let result = results.remove(0);
    if let Some(error) = &result.error {
        warn!(ip = %result.ip, kind = %error.kind(), error = %error, "Single address query failed");
        return Err(QueryError::LookupFailed);
    }

    Ok(Payload::Single(result))
}

/// Array form with two-space indentation, used by direct invocation
pub fn to_pretty_json(results: &[QueryResult]) -> Result<String, QueryError> {
    serde_json::to_string_pretty(results).map_err(QueryError::Encoding)
}
