//!
//! Serde model of the library configuration, usually read from a TOML file
//!

use crate::{cavage::CREATED, crypto::DEFAULT_ALGORITHM, digest::DEFAULT_HASH_ALGORITHM};
use serde::{Deserialize, Serialize};

/// Which side wins when the header's `algorithm` parameter and the secret's algorithm hint disagree
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmPolicy {
    /// Use the secret's hint, fall back to the header parameter
    #[default]
    PreferSecret,

    /// Use the header parameter, fall back to the secret's hint
    PreferHeader,

    /// Reject the signature if both are present and differ
    RequireMatch,
}

/// Header outgoing signatures are written to
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureHeaderKind {
    /// `Signature: keyId=...`
    #[default]
    Signature,

    /// `Authorization: Signature keyId=...`
    Authorization,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct DigestConfiguration {
    pub default_algorithm: String,
}

impl Default for DigestConfiguration {
    fn default() -> Self {
        Self {
            default_algorithm: DEFAULT_HASH_ALGORITHM.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct SignatureConfiguration {
    pub default_algorithm: String,
    pub algorithm_policy: AlgorithmPolicy,
    /// Headers covered by outgoing signatures
    pub default_headers: Vec<String>,
    /// Lifetime of outgoing signatures in seconds
    pub expires_in: Option<u64>,
    pub header: SignatureHeaderKind,
    /// Verify the body digest whenever a verified signature covers `digest`
    pub verify_digest: bool,
}

impl Default for SignatureConfiguration {
    fn default() -> Self {
        Self {
            default_algorithm: DEFAULT_ALGORITHM.into(),
            algorithm_policy: AlgorithmPolicy::default(),
            default_headers: vec![CREATED.into()],
            expires_in: None,
            header: SignatureHeaderKind::default(),
            verify_digest: true,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Configuration {
    pub digest: DigestConfiguration,
    pub signature: SignatureConfiguration,
}

impl Configuration {
    /// Parse a configuration from its TOML representation
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
