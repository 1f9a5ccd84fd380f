//! Request signature verification
//!
//! When a shared secret is configured, callers sign each request with
//! `md5_hex(ip + time + secret)`. The timestamp is opaque: it is mixed into the
//! digest but never checked for freshness, and there is no replay cache.

use md5::{Digest, Md5};
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing required parameters: time and sign")]
    MissingSignature,

    #[error("invalid signature")]
    InvalidSignature,
}

/// Lowercase hex MD5 digest of `input`
pub fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// Signature a caller must send for `address` at `timestamp`
pub fn sign(address: &str, timestamp: &str, secret: &str) -> String {
    let mut payload = String::with_capacity(address.len() + timestamp.len() + secret.len());
    payload.push_str(address);
    payload.push_str(timestamp);
    payload.push_str(secret);
    md5_hex(&payload)
}

/// Check a request signature against the shared secret
pub fn verify(address: &str, timestamp: &str, signature: &str, secret: &str) -> bool {
    if timestamp.is_empty() || signature.is_empty() {
        return false;
    }

    let expected = sign(address, timestamp, secret);
    // ct_eq on slices of different length is false
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

/// Holds the configured secret; only exists when auth is enabled
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    /// `None` when the secret is empty, which disables verification
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self { secret })
        }
    }

    pub fn verify(&self, address: &str, timestamp: &str, signature: &str) -> Result<(), AuthError> {
        if timestamp.is_empty() || signature.is_empty() {
            return Err(AuthError::MissingSignature);
        }

        if verify(address, timestamp, signature, &self.secret) {
            Ok(())
        } else {
            Err(AuthError::InvalidSignature)
        }
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"<redacted>")
            .finish()
    }
}
