use super::{signing_key, verifying_key, CryptoError, SignatureAlgorithm};
use crate::{crypto::parse::{KeyType, SigningKey}, Algorithm, Secret};
use ring::{
    rand::SystemRandom,
    signature::{self, RsaEncoding, RsaParameters, UnparsedPublicKey},
};

fn create(
    padding: &'static dyn RsaEncoding,
    secret: &Secret,
    data: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let SigningKey::Rsa(key) = signing_key(secret, KeyType::Rsa)? else {
        return Err(CryptoError::MissingKey("RSA private"));
    };

    let mut signature = vec![0; key.public().modulus_len()];
    key.sign(padding, &SystemRandom::new(), data, &mut signature)
        .map_err(|_| CryptoError::Signing)?;

    Ok(signature)
}

fn verify(
    parameters: &'static RsaParameters,
    secret: &Secret,
    data: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let key = verifying_key(secret, KeyType::Rsa)?;
    UnparsedPublicKey::new(parameters, key.bytes)
        .verify(data, signature)
        .map_err(|_| CryptoError::Verification)
}

macro_rules! rsa_algorithm {
    ($(#[$meta:meta])* $ty:ident, $name:literal, $padding:expr, $parameters:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $ty;

        impl Algorithm for $ty {
            fn name(&self) -> &str {
                $name
            }
        }

        impl SignatureAlgorithm for $ty {
            fn create(&self, secret: &Secret, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
                create($padding, secret, data)
            }

            fn verify(
                &self,
                secret: &Secret,
                data: &[u8],
                signature: &[u8],
            ) -> Result<(), CryptoError> {
                verify($parameters, secret, data, signature)
            }
        }
    };
}

rsa_algorithm!(
    /// RSASSA-PKCS1-v1_5 with SHA-256
    RsaSha256,
    "RSA-SHA256",
    &signature::RSA_PKCS1_SHA256,
    &signature::RSA_PKCS1_2048_8192_SHA256
);

rsa_algorithm!(
    /// RSASSA-PKCS1-v1_5 with SHA-512
    RsaSha512,
    "RSA-SHA512",
    &signature::RSA_PKCS1_SHA512,
    &signature::RSA_PKCS1_2048_8192_SHA512
);

rsa_algorithm!(
    /// RSASSA-PSS with SHA-256
    RsaSsaPssSha256,
    "RSASSA-PSS-SHA256",
    &signature::RSA_PSS_SHA256,
    &signature::RSA_PSS_2048_8192_SHA256
);

rsa_algorithm!(
    /// RSASSA-PSS with SHA-512
    RsaSsaPssSha512,
    "RSASSA-PSS-SHA512",
    &signature::RSA_PSS_SHA512,
    &signature::RSA_PSS_2048_8192_SHA512
);
