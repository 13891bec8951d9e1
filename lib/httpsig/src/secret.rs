use crate::BoxError;
use derive_builder::Builder;
use std::{collections::HashMap, fmt, hash::BuildHasher};
use thiserror::Error;

/// Key material belonging to a `keyId`
///
/// PEM-encoded keys are parsed lazily by the algorithm that ends up using them
#[derive(Builder, Clone)]
pub struct Secret {
    /// Identifier of the key
    #[builder(setter(into))]
    key_id: String,

    /// PKCS#8 or PKCS#1 PEM private key
    #[builder(default, setter(into, strip_option))]
    private_key: Option<String>,

    /// SPKI or PKCS#1 PEM public key
    #[builder(default, setter(into, strip_option))]
    public_key: Option<String>,

    /// Shared key for symmetric algorithms
    #[builder(default, setter(into, strip_option))]
    shared_key: Option<Vec<u8>>,

    /// Name of the algorithm this key is meant for
    #[builder(default, setter(into, strip_option))]
    algorithm: Option<String>,
}

impl Secret {
    /// Start building a secret
    #[must_use]
    pub fn builder() -> SecretBuilder {
        SecretBuilder::default()
    }

    /// Identifier of the key
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// PEM private key
    #[must_use]
    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_deref()
    }

    /// PEM public key
    #[must_use]
    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }

    /// Shared symmetric key
    #[must_use]
    pub fn shared_key(&self) -> Option<&[u8]> {
        self.shared_key.as_deref()
    }

    /// Algorithm hint
    #[must_use]
    pub fn algorithm(&self) -> Option<&str> {
        self.algorithm.as_deref()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("key_id", &self.key_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "[redacted]"))
            .field("public_key", &self.public_key.is_some())
            .field("shared_key", &self.shared_key.as_ref().map(|_| "[redacted]"))
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// No secret is known under the requested `keyId`
#[derive(Debug, Error)]
#[error("no secret for key '{0}'")]
pub struct SecretNotFound(pub String);

/// Resolve a `keyId` into its secret
pub trait SecretResolver {
    /// Look up the secret of the key
    fn resolve(&self, key_id: &str) -> Result<Secret, BoxError>;
}

impl<F, E> SecretResolver for F
where
    F: Fn(&str) -> Result<Secret, E>,
    E: Into<BoxError>,
{
    fn resolve(&self, key_id: &str) -> Result<Secret, BoxError> {
        (self)(key_id).map_err(Into::into)
    }
}

impl<S> SecretResolver for HashMap<String, Secret, S>
where
    S: BuildHasher,
{
    fn resolve(&self, key_id: &str) -> Result<Secret, BoxError> {
        self.get(key_id)
            .cloned()
            .ok_or_else(|| SecretNotFound(key_id.to_owned()).into())
    }
}

#[cfg(test)]
mod test {
    use super::{Secret, SecretResolver};
    use std::collections::HashMap;

    #[test]
    fn debug_redacts_keys() {
        let secret = Secret::builder()
            .key_id("Test")
            .shared_key(b"very secret".to_vec())
            .build()
            .unwrap();

        let debug = format!("{secret:?}");
        assert!(debug.contains("Test"));
        assert!(!debug.contains("very secret"));
    }

    #[test]
    fn missing_key_id_fails_build() {
        assert!(Secret::builder().algorithm("HMAC-SHA256").build().is_err());
    }

    #[test]
    fn map_resolver() {
        let secret = Secret::builder().key_id("Test").build().unwrap();
        let secrets = HashMap::from([("Test".to_owned(), secret)]);

        assert_eq!(secrets.resolve("Test").unwrap().key_id(), "Test");
        assert_eq!(
            secrets.resolve("Other").unwrap_err().to_string(),
            "no secret for key 'Other'"
        );
    }
}
