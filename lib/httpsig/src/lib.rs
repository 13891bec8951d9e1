//!
//! HTTP signatures and body digests
//!
//! Parses `Authorization`, `Signature` and `Digest` headers with a hand-written scanner,
//! and signs/verifies messages through pluggable algorithm registries
//!

use http::HeaderName;

pub use self::{
    error::Error,
    message::HttpMessage,
    registry::{Algorithm, Registry, UnsupportedAlgorithm},
    secret::{Secret, SecretBuilder, SecretBuilderError, SecretNotFound, SecretResolver},
    signatures::{HttpSignatures, VerifiedSignature},
};

pub mod cavage;
pub mod config;
pub mod crypto;
pub mod digest;

mod error;
mod message;
mod registry;
mod secret;
mod signatures;

/// Type-erased error returned by user-provided collaborators
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

static SIGNATURE_HEADER: HeaderName = HeaderName::from_static("signature");
static DIGEST_HEADER: HeaderName = HeaderName::from_static("digest");
