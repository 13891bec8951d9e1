//!
//! Cavage-style `Authorization`/`Signature` and `Digest` headers
//!

use miette::Diagnostic;
use std::time::{Duration, SystemTime};
use thiserror::Error;

mod parse;
mod serialise;

pub mod signature_string;

pub use self::{
    parse::{parse, parse_authorization, parse_digest, ParseError},
    serialise::serialise,
};

/// Keyword an `Authorization` header has to start with
pub const SIGNATURE_KEYWORD: &str = "Signature";

/// Pseudo-header carrying the creation timestamp
pub const CREATED: &str = "(created)";

/// Pseudo-header carrying the expiry timestamp
pub const EXPIRES: &str = "(expires)";

/// Pseudo-header carrying the method and the path of the request
pub const REQUEST_TARGET: &str = "(request-target)";

/// Parsed `Authorization` or `Signature` header
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignatureHeader<'a> {
    /// `Signature` for `Authorization` headers, absent for `Signature` headers
    pub keyword: Option<&'a str>,
    pub key_id: &'a str,
    /// Base64-encoded signature
    pub signature: &'a str,
    pub algorithm: Option<&'a str>,
    /// Seconds since the Unix epoch
    pub created: Option<u64>,
    /// Seconds since the Unix epoch
    pub expires: Option<u64>,
    /// Covered headers, in signing order
    pub headers: Vec<&'a str>,
}

impl SignatureHeader<'_> {
    /// Check that the required `keyId` and `signature` parameters were present
    pub fn verify_required_fields(&self) -> Result<(), FieldError> {
        if self.key_id.is_empty() {
            return Err(FieldError::MissingKeyId);
        }

        if self.signature.is_empty() {
            return Err(FieldError::MissingSignature);
        }

        Ok(())
    }

    /// `created` parameter as a point in time
    #[must_use]
    pub fn created_at(&self) -> Option<SystemTime> {
        self.created.and_then(from_unix_timestamp)
    }

    /// `expires` parameter as a point in time
    #[must_use]
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires.and_then(from_unix_timestamp)
    }
}

/// Parsed `Digest` header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigestHeader<'a> {
    /// Upper-cased algorithm name
    pub algorithm: String,
    /// Encoded digest, exactly as it appeared in the header
    pub digest: &'a str,
}

/// Required parameter missing from an otherwise well-formed header
#[derive(Debug, Diagnostic, Error)]
pub enum FieldError {
    /// `keyId` wasn't set
    #[error("keyId is not set in header")]
    MissingKeyId,

    /// `signature` wasn't set
    #[error("signature is not set in header")]
    MissingSignature,
}

/// `None` if the timestamp lies outside of what the platform clock can represent
pub(crate) fn from_unix_timestamp(secs: u64) -> Option<SystemTime> {
    SystemTime::UNIX_EPOCH.checked_add(Duration::from_secs(secs))
}
