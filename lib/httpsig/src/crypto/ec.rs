use super::{signing_key, verifying_key, CryptoError, SignatureAlgorithm};
use crate::{
    crypto::parse::{KeyType, SigningKey},
    Algorithm, Secret,
};
use ring::{
    rand::SystemRandom,
    signature::{UnparsedPublicKey, ECDSA_P256_SHA256_ASN1, ED25519},
};

/// ECDSA over P-256 with SHA-256, ASN.1 encoded signatures
#[derive(Clone, Copy, Debug, Default)]
pub struct EcdsaSha256;

impl Algorithm for EcdsaSha256 {
    fn name(&self) -> &str {
        "ECDSA-SHA256"
    }
}

impl SignatureAlgorithm for EcdsaSha256 {
    fn create(&self, secret: &Secret, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let SigningKey::Ecdsa(key) = signing_key(secret, KeyType::Ecdsa)? else {
            return Err(CryptoError::MissingKey("ECDSA private"));
        };

        let signature = key
            .sign(&SystemRandom::new(), data)
            .map_err(|_| CryptoError::Signing)?;

        Ok(signature.as_ref().to_vec())
    }

    fn verify(&self, secret: &Secret, data: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let key = verifying_key(secret, KeyType::Ecdsa)?;
        UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, key.bytes)
            .verify(data, signature)
            .map_err(|_| CryptoError::Verification)
    }
}

/// Ed25519
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519;

impl Algorithm for Ed25519 {
    fn name(&self) -> &str {
        "ED25519"
    }
}

impl SignatureAlgorithm for Ed25519 {
    fn create(&self, secret: &Secret, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let SigningKey::Ed25519(key) = signing_key(secret, KeyType::Ed25519)? else {
            return Err(CryptoError::MissingKey("Ed25519 private"));
        };

        Ok(key.sign(data).as_ref().to_vec())
    }

    fn verify(&self, secret: &Secret, data: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let key = verifying_key(secret, KeyType::Ed25519)?;
        UnparsedPublicKey::new(&ED25519, key.bytes)
            .verify(data, signature)
            .map_err(|_| CryptoError::Verification)
    }
}
