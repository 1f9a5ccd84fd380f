//! Batch IP query pipeline
//!
//! `gateway` composes signature verification, batch resolution and response
//! shaping into the single contract used by both the HTTP endpoint and the
//! one-shot `--query` mode.

pub mod gateway;
pub mod models;
pub mod resolver;
pub mod shaper;

use thiserror::Error;

use crate::auth::AuthError;

pub use gateway::{QueryGateway, QueryParams};
pub use models::{ErrorKind, ItemError, QueryResult};
pub use resolver::{split_addresses, BatchResolver};
pub use shaper::{shape, Payload};

/// Request-level failure
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("missing required parameter: ip")]
    MissingAddress,

    #[error("missing required parameters: time and sign")]
    MissingSignature,

    #[error("invalid signature")]
    Unauthorized,

    #[error("lookup failed")]
    LookupFailed,

    #[error("failed to encode response")]
    Encoding(#[source] serde_json::Error),
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingAddress | Self::MissingSignature => ErrorKind::RequestMalformed,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::LookupFailed => ErrorKind::LookupFailed,
            Self::Encoding(_) => ErrorKind::EncodingFailed,
        }
    }

    /// Whether the caller is at fault, as opposed to the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RequestMalformed | ErrorKind::Unauthorized
        )
    }
}

impl From<AuthError> for QueryError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingSignature => Self::MissingSignature,
            AuthError::InvalidSignature => Self::Unauthorized,
        }
    }
}
