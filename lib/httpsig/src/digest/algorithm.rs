use crate::{crypto::CryptoError, Algorithm};
use subtle::ConstantTimeEq;

/// Hash algorithm usable for `Digest` headers
pub trait DigestHashAlgorithm: Algorithm + Send + Sync {
    /// Hash the data
    fn create(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Recompute the hash of the data and compare it against the decoded digest
    fn verify(&self, data: &[u8], digest: &[u8]) -> Result<(), CryptoError>;
}

#[inline]
fn hash<D>(data: &[u8]) -> Vec<u8>
where
    D: sha2::Digest,
{
    D::digest(data).to_vec()
}

#[inline]
fn compare(computed: &[u8], digest: &[u8]) -> Result<(), CryptoError> {
    if bool::from(computed.ct_eq(digest)) {
        Ok(())
    } else {
        Err(CryptoError::WrongHash)
    }
}

macro_rules! hash_algorithm {
    ($(#[$meta:meta])* $ty:ident, $name:literal, $hasher:ty) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $ty;

        impl Algorithm for $ty {
            fn name(&self) -> &str {
                $name
            }
        }

        impl DigestHashAlgorithm for $ty {
            fn create(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
                Ok(hash::<$hasher>(data))
            }

            fn verify(&self, data: &[u8], digest: &[u8]) -> Result<(), CryptoError> {
                compare(&hash::<$hasher>(data), digest)
            }
        }
    };
}

hash_algorithm!(
    /// MD5
    Md5,
    "MD5",
    md5::Md5
);

hash_algorithm!(
    /// SHA-256
    Sha256,
    "SHA-256",
    sha2::Sha256
);

hash_algorithm!(
    /// SHA-512
    Sha512,
    "SHA-512",
    sha2::Sha512
);
