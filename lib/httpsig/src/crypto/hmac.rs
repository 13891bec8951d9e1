use super::{shared_key, CryptoError, SignatureAlgorithm};
use crate::{Algorithm, Secret};
use ring::hmac;

fn create(
    algorithm: hmac::Algorithm,
    secret: &Secret,
    data: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let key = hmac::Key::new(algorithm, shared_key(secret)?);
    Ok(hmac::sign(&key, data).as_ref().to_vec())
}

/// Constant-time comparison happens inside of `ring`
fn verify(
    algorithm: hmac::Algorithm,
    secret: &Secret,
    data: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let key = hmac::Key::new(algorithm, shared_key(secret)?);
    hmac::verify(&key, data, signature).map_err(|_| CryptoError::Verification)
}

/// HMAC with SHA-256
#[derive(Clone, Copy, Debug, Default)]
pub struct HmacSha256;

impl Algorithm for HmacSha256 {
    fn name(&self) -> &str {
        "HMAC-SHA256"
    }
}

impl SignatureAlgorithm for HmacSha256 {
    fn create(&self, secret: &Secret, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        create(hmac::HMAC_SHA256, secret, data)
    }

    fn verify(&self, secret: &Secret, data: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        verify(hmac::HMAC_SHA256, secret, data, signature)
    }
}

/// HMAC with SHA-512
#[derive(Clone, Copy, Debug, Default)]
pub struct HmacSha512;

impl Algorithm for HmacSha512 {
    fn name(&self) -> &str {
        "HMAC-SHA512"
    }
}

impl SignatureAlgorithm for HmacSha512 {
    fn create(&self, secret: &Secret, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        create(hmac::HMAC_SHA512, secret, data)
    }

    fn verify(&self, secret: &Secret, data: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        verify(hmac::HMAC_SHA512, secret, data, signature)
    }
}

#[cfg(test)]
mod test {
    use super::HmacSha256;
    use crate::{crypto::CryptoError, crypto::SignatureAlgorithm, Secret};

    fn secret() -> Secret {
        Secret::builder()
            .key_id("Test")
            .shared_key(b"correct horse battery staple".to_vec())
            .build()
            .unwrap()
    }

    #[test]
    fn sign_and_verify() {
        let signature = HmacSha256.create(&secret(), b"hello").unwrap();
        assert_eq!(signature.len(), 32);
        assert!(HmacSha256.verify(&secret(), b"hello", &signature).is_ok());
        assert!(matches!(
            HmacSha256.verify(&secret(), b"hello!", &signature),
            Err(CryptoError::Verification)
        ));
    }

    #[test]
    fn missing_shared_key() {
        let secret = Secret::builder().key_id("Test").build().unwrap();
        assert!(matches!(
            HmacSha256.create(&secret, b"hello"),
            Err(CryptoError::MissingKey("shared"))
        ));
    }
}
