//!
//! Signature algorithms and the cryptographic errors they share
//!

use self::parse::{KeyType, PublicKey, SigningKey};
use crate::{Algorithm, BoxError, Registry, Secret};
use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;

mod ec;
mod hmac;
mod rsa;

pub mod parse;

pub use self::{
    ec::{EcdsaSha256, Ed25519},
    hmac::{HmacSha256, HmacSha512},
    rsa::{RsaSha256, RsaSha512, RsaSsaPssSha256, RsaSsaPssSha512},
};

/// Name of the algorithm registered as default in [`standard_algorithms`]
pub const DEFAULT_ALGORITHM: &str = "RSA-SHA256";

/// Low-level hashing/signing/verification failure
#[derive(Debug, Diagnostic, Error)]
pub enum CryptoError {
    /// Key material failed to parse
    #[error(transparent)]
    Key(#[from] parse::Error),

    /// Secret doesn't carry the kind of key the algorithm needs
    #[error("secret has no {0} key")]
    MissingKey(&'static str),

    /// Signature creation failed
    #[error("signing failed")]
    Signing,

    /// Signature didn't verify
    #[error("verification failed")]
    Verification,

    /// Recomputed hash doesn't match the supplied one
    #[error("wrong hash")]
    WrongHash,

    /// Failure reported by a custom algorithm
    #[error(transparent)]
    Other(BoxError),
}

/// Signature algorithm usable for creating and verifying HTTP signatures
///
/// Implementations are stateless and shared between callers
pub trait SignatureAlgorithm: Algorithm + Send + Sync {
    /// Sign the data with the private/shared key of the secret
    fn create(&self, secret: &Secret, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Verify the signature over the data with the public/shared key of the secret
    fn verify(&self, secret: &Secret, data: &[u8], signature: &[u8]) -> Result<(), CryptoError>;
}

/// Registry seeded with every algorithm this crate ships, defaulting to [`DEFAULT_ALGORITHM`]
#[must_use]
pub fn standard_algorithms() -> Registry<dyn SignatureAlgorithm> {
    let mut registry: Registry<dyn SignatureAlgorithm> = Registry::new();
    registry.register(Arc::new(RsaSha256));
    registry.register(Arc::new(RsaSha512));
    registry.register(Arc::new(RsaSsaPssSha256));
    registry.register(Arc::new(RsaSsaPssSha512));
    registry.register(Arc::new(EcdsaSha256));
    registry.register(Arc::new(Ed25519));
    registry.register(Arc::new(HmacSha256));
    registry.register(Arc::new(HmacSha512));

    let _ = registry.set_default(DEFAULT_ALGORITHM);
    registry
}

fn signing_key(secret: &Secret, key_type: KeyType) -> Result<SigningKey, CryptoError> {
    let pem = secret.private_key().ok_or(CryptoError::MissingKey("private"))?;
    let key = parse::private_key(pem)?;
    key_type.ensure(key.key_type())?;

    Ok(key)
}

/// Public key of the secret, derived from the private key if no public key is set
fn verifying_key(secret: &Secret, key_type: KeyType) -> Result<PublicKey, CryptoError> {
    let key = if let Some(pem) = secret.public_key() {
        parse::public_key(pem)?
    } else if let Some(pem) = secret.private_key() {
        parse::private_key(pem)?.public_key()
    } else {
        return Err(CryptoError::MissingKey("public"));
    };
    key_type.ensure(key.key_type)?;

    Ok(key)
}

fn shared_key(secret: &Secret) -> Result<&[u8], CryptoError> {
    secret.shared_key().ok_or(CryptoError::MissingKey("shared"))
}

#[cfg(test)]
mod test {
    use super::standard_algorithms;
    use crate::crypto::DEFAULT_ALGORITHM;

    #[test]
    fn standard_registry() {
        let registry = standard_algorithms();
        assert_eq!(registry.default_name(), Some(DEFAULT_ALGORITHM));

        let mut names = registry.names().collect::<Vec<_>>();
        names.sort_unstable();
        assert_eq!(
            names,
            [
                "ECDSA-SHA256",
                "ED25519",
                "HMAC-SHA256",
                "HMAC-SHA512",
                "RSA-SHA256",
                "RSA-SHA512",
                "RSASSA-PSS-SHA256",
                "RSASSA-PSS-SHA512",
            ]
        );
    }
}
