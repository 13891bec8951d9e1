use crate::{
    cavage::{signature_string, FieldError, ParseError},
    crypto::CryptoError,
    digest::DigestError,
    BoxError, UnsupportedAlgorithm,
};
use http::header::{InvalidHeaderValue, ToStrError};
use miette::Diagnostic;
use std::time::SystemTimeError;
use thiserror::Error;

/// Signing/verification error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Header and secret name different algorithms under
    /// [`AlgorithmPolicy::RequireMatch`](crate::config::AlgorithmPolicy::RequireMatch)
    #[error("algorithm mismatch: header names '{header}', secret names '{secret}'")]
    AlgorithmMismatch {
        /// Algorithm named by the header
        header: String,

        /// Algorithm named by the secret
        secret: String,
    },

    /// Signature creation failed
    #[error("error creating signature '{algorithm}': {source}")]
    Create {
        /// Algorithm that was used
        algorithm: String,

        /// Underlying failure
        #[source]
        source: CryptoError,
    },

    /// Signature isn't valid Base64
    #[error("error decoding signature from base64")]
    Decode(#[source] base64_simd::Error),

    /// Digest creation or verification failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Digest(#[from] DigestError),

    /// Required parameter missing
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Generated header value is not a valid HTTP header value
    #[error(transparent)]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    /// Signature/Authorization header is missing
    #[error("Signature/Authorization header missing")]
    MissingSignatureHeader,

    /// Signature header is malformed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    /// Secret resolver failed
    #[error("couldn't resolve secret for key '{key_id}'")]
    Secret {
        /// Requested key
        key_id: String,

        /// Resolver failure
        #[source]
        source: BoxError,
    },

    /// Signature string construction failure
    #[error(transparent)]
    SignatureString(#[from] signature_string::Error),

    /// System clock is before the Unix epoch
    #[error(transparent)]
    SystemTime(#[from] SystemTimeError),

    /// Header value isn't valid UTF-8
    #[error(transparent)]
    ToStr(#[from] ToStrError),

    /// Signature algorithm isn't registered
    #[error("unsupported signature algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    /// Signature didn't verify
    #[error("error verifying signature '{algorithm}': {source}")]
    Verify {
        /// Algorithm that was used
        algorithm: String,

        /// Underlying failure
        #[source]
        source: CryptoError,
    },
}

impl From<UnsupportedAlgorithm> for Error {
    fn from(value: UnsupportedAlgorithm) -> Self {
        Self::UnsupportedAlgorithm(value.0)
    }
}
