use crate::{
    cavage::{self, from_unix_timestamp, signature_string, SignatureHeader, SIGNATURE_KEYWORD},
    config::{AlgorithmPolicy, Configuration, SignatureHeaderKind},
    crypto::{self, SignatureAlgorithm},
    digest::{Digest, DigestError},
    Error, HttpMessage, Registry, Secret, SecretResolver, UnsupportedAlgorithm, DIGEST_HEADER,
    SIGNATURE_HEADER,
};
use http::{
    header::{AUTHORIZATION, DATE},
    HeaderValue,
};
use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};
use tracing::{debug, instrument};

/// `algorithm` value that defers the choice to the key
const HS2019: &str = "hs2019";

/// Outcome of a successful verification
///
/// The timestamps are handed back untouched, judging their freshness is up to the caller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedSignature {
    pub key_id: String,
    /// Name of the algorithm the signature was verified with
    pub algorithm: String,
    pub created: Option<u64>,
    pub expires: Option<u64>,
}

impl VerifiedSignature {
    /// `created` parameter as a point in time
    #[must_use]
    pub fn created_at(&self) -> Option<SystemTime> {
        self.created.and_then(from_unix_timestamp)
    }

    /// `expires` parameter as a point in time
    #[must_use]
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires.and_then(from_unix_timestamp)
    }

    /// Check whether the `expires` parameter lies before `now`
    ///
    /// Signatures without a representable `expires` never expire by this check
    #[must_use]
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.expires_at().is_some_and(|expires| expires < now)
    }
}

/// Creates and verifies HTTP signatures
///
/// Holds the secret resolver, the signature algorithm registry and the digest handling.
/// Set up once, then shared for every message.
pub struct HttpSignatures<R> {
    resolver: R,
    algorithms: Registry<dyn SignatureAlgorithm>,
    digest: Digest,
    algorithm_policy: AlgorithmPolicy,
    default_headers: Vec<String>,
    expires_in: Option<Duration>,
    header: SignatureHeaderKind,
    verify_digest: bool,
}

impl<R> HttpSignatures<R>
where
    R: SecretResolver,
{
    /// Construct with every bundled algorithm and the default configuration
    #[must_use]
    pub fn new(resolver: R) -> Self {
        let config = Configuration::default();

        Self {
            resolver,
            algorithms: crypto::standard_algorithms(),
            digest: Digest::new(),
            algorithm_policy: config.signature.algorithm_policy,
            default_headers: config.signature.default_headers,
            expires_in: None,
            header: config.signature.header,
            verify_digest: config.signature.verify_digest,
        }
    }

    /// Construct from a configuration
    ///
    /// Fails if one of the configured default algorithms isn't registered
    pub fn from_configuration(resolver: R, config: &Configuration) -> Result<Self, Error> {
        let mut signatures = Self::new(resolver);
        signatures.set_default_signature_algorithm(&config.signature.default_algorithm)?;
        signatures
            .digest
            .set_default_hash_algorithm(&config.digest.default_algorithm)
            .map_err(DigestError::from)?;

        signatures.algorithm_policy = config.signature.algorithm_policy;
        signatures
            .default_headers
            .clone_from(&config.signature.default_headers);
        signatures.expires_in = config.signature.expires_in.map(Duration::from_secs);
        signatures.header = config.signature.header;
        signatures.verify_digest = config.signature.verify_digest;

        Ok(signatures)
    }

    /// Register a signature algorithm, replacing any algorithm with the same name
    pub fn set_signature_algorithm<A>(&mut self, algorithm: A)
    where
        A: SignatureAlgorithm + 'static,
    {
        self.algorithms.register(Arc::new(algorithm));
    }

    /// Select the algorithm used when neither the header nor the secret name one
    pub fn set_default_signature_algorithm(
        &mut self,
        name: &str,
    ) -> Result<(), UnsupportedAlgorithm> {
        self.algorithms.set_default(name)
    }

    pub fn set_algorithm_policy(&mut self, policy: AlgorithmPolicy) {
        self.algorithm_policy = policy;
    }

    /// Headers covered by outgoing signatures
    pub fn set_default_headers<I, S>(&mut self, headers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_headers = headers.into_iter().map(Into::into).collect();
    }

    /// Lifetime of outgoing signatures, written as the `expires` parameter
    pub fn set_expires_in(&mut self, expires_in: Option<Duration>) {
        self.expires_in = expires_in;
    }

    pub fn set_signature_header(&mut self, header: SignatureHeaderKind) {
        self.header = header;
    }

    pub fn set_verify_digest(&mut self, verify_digest: bool) {
        self.verify_digest = verify_digest;
    }

    /// Registered signature algorithms
    #[must_use]
    pub fn algorithms(&self) -> &Registry<dyn SignatureAlgorithm> {
        &self.algorithms
    }

    #[must_use]
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    pub fn digest_mut(&mut self) -> &mut Digest {
        &mut self.digest
    }

    /// Sign the message with the key behind `key_id` at the current time
    pub fn sign<M>(&self, key_id: &str, message: &mut M) -> Result<(), Error>
    where
        M: HttpMessage + ?Sized,
    {
        self.sign_at(key_id, message, SystemTime::now())
    }

    /// Sign the message with the key behind `key_id`, treating `now` as the signing time
    ///
    /// Adds `Date` and `Digest` headers if they are covered but missing
    #[instrument(skip_all, fields(key_id = key_id))]
    pub fn sign_at<M>(&self, key_id: &str, message: &mut M, now: SystemTime) -> Result<(), Error>
    where
        M: HttpMessage + ?Sized,
    {
        let secret = self.resolve_secret(key_id)?;
        let algorithm = self.resolve_algorithm(None, &secret)?;

        let created = now.duration_since(SystemTime::UNIX_EPOCH)?.as_secs();
        let expires = self
            .expires_in
            .map(|expires_in| created.saturating_add(expires_in.as_secs()));

        let covers = |name: &str| {
            self.default_headers
                .iter()
                .any(|header| header.eq_ignore_ascii_case(name))
        };

        if covers(DATE.as_str()) && !message.headers().contains_key(DATE) {
            let date = HeaderValue::from_str(&httpdate::fmt_http_date(now))?;
            message.headers_mut().insert(DATE, date);
        }

        if covers(DIGEST_HEADER.as_str())
            && !message.headers().contains_key(&DIGEST_HEADER)
            && !message.body().is_empty()
        {
            let digest = self.digest.create_default(message.body())?;
            message
                .headers_mut()
                .insert(DIGEST_HEADER.clone(), HeaderValue::from_str(&digest)?);
        }

        let keyword = match self.header {
            SignatureHeaderKind::Authorization => Some(SIGNATURE_KEYWORD),
            SignatureHeaderKind::Signature => None,
        };

        let signature_header = SignatureHeader {
            keyword,
            key_id,
            signature: "",
            algorithm: Some(algorithm.name()),
            created: Some(created),
            expires,
            headers: self.default_headers.iter().map(String::as_str).collect(),
        };

        let signature_string = signature_string::construct(&*message, &signature_header)?;
        let signature = algorithm
            .create(&secret, signature_string.as_bytes())
            .map_err(|source| Error::Create {
                algorithm: algorithm.name().to_owned(),
                source,
            })?;

        let encoded_signature = base64_simd::STANDARD.encode_to_string(signature);
        let signature_header = SignatureHeader {
            signature: &encoded_signature,
            ..signature_header
        };

        let header_value = HeaderValue::from_str(&cavage::serialise(&signature_header))?;
        let header_name = match self.header {
            SignatureHeaderKind::Authorization => AUTHORIZATION,
            SignatureHeaderKind::Signature => SIGNATURE_HEADER.clone(),
        };
        message.headers_mut().insert(header_name, header_value);

        Ok(())
    }

    /// Verify the `Signature` (or, if absent, `Authorization`) header of the message
    ///
    /// Verifies the body digest as well when the signature covers `digest`
    /// and digest verification is enabled
    #[instrument(skip_all)]
    pub fn verify<M>(&self, message: &M) -> Result<VerifiedSignature, Error>
    where
        M: HttpMessage + ?Sized,
    {
        let headers = message.headers();
        let signature_header = if let Some(value) = headers.get(&SIGNATURE_HEADER) {
            cavage::parse(value.to_str()?)?
        } else if let Some(value) = headers.get(AUTHORIZATION) {
            cavage::parse_authorization(value.to_str()?)?
        } else {
            debug!("Missing 'Signature' and 'Authorization' header");
            return Err(Error::MissingSignatureHeader);
        };

        signature_header.verify_required_fields()?;

        let secret = self.resolve_secret(signature_header.key_id)?;
        let algorithm = self.resolve_algorithm(signature_header.algorithm, &secret)?;

        let signature_string = signature_string::construct(message, &signature_header)?;
        let signature = base64_simd::STANDARD
            .decode_to_vec(signature_header.signature)
            .map_err(Error::Decode)?;

        algorithm
            .verify(&secret, signature_string.as_bytes(), &signature)
            .map_err(|source| {
                debug!(
                    key_id = signature_header.key_id,
                    algorithm = algorithm.name(),
                    error = %source,
                    "signature rejected"
                );
                Error::Verify {
                    algorithm: algorithm.name().to_owned(),
                    source,
                }
            })?;

        let covers_digest = signature_header
            .headers
            .iter()
            .any(|name| name.eq_ignore_ascii_case(DIGEST_HEADER.as_str()));

        if self.verify_digest && covers_digest {
            self.digest.verify(message)?;
        }

        Ok(VerifiedSignature {
            key_id: signature_header.key_id.to_owned(),
            algorithm: algorithm.name().to_owned(),
            created: signature_header.created,
            expires: signature_header.expires,
        })
    }

    fn resolve_secret(&self, key_id: &str) -> Result<Secret, Error> {
        self.resolver.resolve(key_id).map_err(|source| {
            debug!(key_id, error = %source, "couldn't resolve secret");
            Error::Secret {
                key_id: key_id.to_owned(),
                source,
            }
        })
    }

    /// Pick the algorithm according to the configured [`AlgorithmPolicy`]
    ///
    /// Falls back to the default algorithm if neither side names one
    fn resolve_algorithm(
        &self,
        header_hint: Option<&str>,
        secret: &Secret,
    ) -> Result<&Arc<dyn SignatureAlgorithm>, Error> {
        let header_hint = header_hint.filter(|name| !name.eq_ignore_ascii_case(HS2019));
        let secret_hint = secret.algorithm();

        let name = match (self.algorithm_policy, header_hint, secret_hint) {
            (AlgorithmPolicy::RequireMatch, Some(header), Some(secret))
                if !header.eq_ignore_ascii_case(secret) =>
            {
                return Err(Error::AlgorithmMismatch {
                    header: header.to_owned(),
                    secret: secret.to_owned(),
                });
            }
            (AlgorithmPolicy::PreferHeader, Some(header), _) => Some(header),
            (_, _, Some(secret)) => Some(secret),
            (_, header, None) => header,
        };

        match name {
            Some(name) => Ok(self.algorithms.get(name)?),
            None => self
                .algorithms
                .default_algorithm()
                .ok_or_else(|| Error::UnsupportedAlgorithm(String::new())),
        }
    }
}
