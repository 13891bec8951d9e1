//!
//! `Digest` header creation and verification
//!

use crate::{
    cavage::{self, ParseError},
    crypto::CryptoError,
    HttpMessage, Registry, UnsupportedAlgorithm, DIGEST_HEADER,
};
use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

mod algorithm;

pub use self::algorithm::{DigestHashAlgorithm, Md5, Sha256, Sha512};

/// Name of the hash algorithm [`Digest::new`] selects as default
pub const DEFAULT_HASH_ALGORITHM: &str = "SHA-256";

/// Digest error
#[derive(Debug, Diagnostic, Error)]
pub enum DigestError {
    /// Hashing failed
    #[error("error creating digest hash '{algorithm}': {source}")]
    Create {
        /// Algorithm that was used
        algorithm: String,

        /// Underlying failure
        #[source]
        source: CryptoError,
    },

    /// Supplied digest isn't valid Base64
    #[error("error decoding digest from base64")]
    Decode(#[source] base64_simd::Error),

    /// Message has no body to hash
    #[error("empty body")]
    EmptyBody,

    /// `Digest` header value isn't valid UTF-8
    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::ToStrError),

    /// `Digest` header is malformed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    /// Hash algorithm isn't registered
    #[error("unsupported digest hash algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    /// Recomputed hash doesn't match the supplied digest
    #[error("wrong digest: {0}")]
    WrongDigest(#[source] CryptoError),
}

impl From<UnsupportedAlgorithm> for DigestError {
    fn from(value: UnsupportedAlgorithm) -> Self {
        Self::UnsupportedAlgorithm(value.0)
    }
}

/// `Digest` header handling over a registry of hash algorithms
#[derive(Debug)]
pub struct Digest {
    algorithms: Registry<dyn DigestHashAlgorithm>,
}

impl Digest {
    /// Construct with MD5, SHA-256 and SHA-512 registered and SHA-256 as the default
    #[must_use]
    pub fn new() -> Self {
        let mut algorithms: Registry<dyn DigestHashAlgorithm> = Registry::new();
        algorithms.register(Arc::new(Md5));
        algorithms.register(Arc::new(Sha256));
        algorithms.register(Arc::new(Sha512));
        let _ = algorithms.set_default(DEFAULT_HASH_ALGORITHM);

        Self { algorithms }
    }

    /// Register a hash algorithm, replacing any algorithm with the same name
    pub fn set_hash_algorithm<A>(&mut self, algorithm: A)
    where
        A: DigestHashAlgorithm + 'static,
    {
        self.algorithms.register(Arc::new(algorithm));
    }

    /// Select the default hash algorithm
    ///
    /// Fails and keeps the previous default if the algorithm isn't registered
    pub fn set_default_hash_algorithm(&mut self, name: &str) -> Result<(), UnsupportedAlgorithm> {
        self.algorithms.set_default(name)
    }

    /// Name of the default hash algorithm
    #[must_use]
    pub fn default_hash_algorithm(&self) -> Option<&str> {
        self.algorithms.default_name()
    }

    /// Registered hash algorithms
    #[must_use]
    pub fn algorithms(&self) -> &Registry<dyn DigestHashAlgorithm> {
        &self.algorithms
    }

    /// Hash the body and format it as a `Digest` header value (`NAME=base64`)
    pub fn create(&self, algorithm: &str, body: &[u8]) -> Result<String, DigestError> {
        let algorithm = self.algorithms.get(algorithm)?;
        let hash = algorithm
            .create(body)
            .map_err(|source| DigestError::Create {
                algorithm: algorithm.name().to_owned(),
                source,
            })?;

        Ok(format!(
            "{}={}",
            algorithm.name(),
            base64_simd::STANDARD.encode_to_string(hash)
        ))
    }

    /// Same as [`Digest::create`] with the default hash algorithm
    pub fn create_default(&self, body: &[u8]) -> Result<String, DigestError> {
        let name = self
            .algorithms
            .default_name()
            .ok_or_else(|| DigestError::UnsupportedAlgorithm(String::new()))?;

        self.create(name, body)
    }

    /// Verify the `Digest` header of the message against its body
    ///
    /// A missing header is treated like an empty one
    pub fn verify<M>(&self, message: &M) -> Result<(), DigestError>
    where
        M: HttpMessage + ?Sized,
    {
        let body = message.body();
        if body.is_empty() {
            debug!("rejecting digest of an empty body");
            return Err(DigestError::EmptyBody);
        }

        let header = match message.headers().get(&DIGEST_HEADER) {
            Some(value) => value.to_str()?,
            None => "",
        };

        self.verify_value(header, body)
    }

    /// Verify a raw `Digest` header value against a body
    pub fn verify_value(&self, header: &str, body: &[u8]) -> Result<(), DigestError> {
        if body.is_empty() {
            return Err(DigestError::EmptyBody);
        }

        let header = cavage::parse_digest(header)?;
        let algorithm = self
            .algorithms
            .get(&header.algorithm)
            .map_err(|_| DigestError::UnsupportedAlgorithm(header.algorithm.clone()))?;

        let digest = base64_simd::STANDARD
            .decode_to_vec(header.digest)
            .map_err(DigestError::Decode)?;

        algorithm.verify(body, &digest).map_err(|err| {
            debug!(algorithm = algorithm.name(), "digest mismatch");
            DigestError::WrongDigest(err)
        })
    }
}

impl Default for Digest {
    fn default() -> Self {
        Self::new()
    }
}
