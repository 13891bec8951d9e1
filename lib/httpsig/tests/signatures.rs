use http::header::{AUTHORIZATION, DATE};
use httpsig::{
    cavage,
    config::{AlgorithmPolicy, Configuration, SignatureHeaderKind},
    crypto::CryptoError,
    Error, HttpSignatures, Secret, SecretNotFound,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};


const ALGORITHMS: &[&str] = &[
    "RSA-SHA256",
    "RSA-SHA512",
    "RSASSA-PSS-SHA256",
    "RSASSA-PSS-SHA512",
    "ECDSA-SHA256",
    "ED25519",
    "HMAC-SHA256",
    "HMAC-SHA512",
];

const COVERED_HEADERS: &[&str] = &[
    "(request-target)",
    "(created)",
    "host",
    "date",
    "digest",
];

fn signatures(secret: Secret) -> HttpSignatures<HashMap<String, Secret>> {
    let secrets = HashMap::from([(secret.key_id().to_owned(), secret)]);
    let mut signatures = HttpSignatures::new(secrets);
    signatures.set_default_headers(COVERED_HEADERS.iter().copied());
    signatures
}

fn signature_header<B>(request: &http::Request<B>) -> String {
    request.headers()["signature"].to_str().unwrap().to_owned()
}

/// Replace the signature parameter with one that has a single bit flipped
fn flip_signature_bit(header: &str, bit: usize) -> String {
    let parsed = cavage::parse(header).unwrap();
    let mut signature = base64_simd::STANDARD
        .decode_to_vec(parsed.signature)
        .unwrap();
    signature[bit / 8] ^= 1 << (bit % 8);

    let encoded = base64_simd::STANDARD.encode_to_string(&signature);
    cavage::serialise(&cavage::SignatureHeader {
        signature: &encoded,
        ..parsed
    })
}

#[test]
fn round_trip_every_algorithm() {
    for algorithm in ALGORITHMS {
        let signatures = signatures(self::data::secret("Test", algorithm));
        let mut request = self::data::get_request();

        signatures.sign("Test", &mut request).unwrap();
        let verified = signatures.verify(&request).unwrap();

        assert_eq!(verified.key_id, "Test");
        assert_eq!(verified.algorithm, *algorithm);
        assert!(verified.created.is_some());
        assert!(verified.expires.is_none());
    }
}

#[test]
fn flipped_bit_fails_every_algorithm() {
    for algorithm in ALGORITHMS {
        let signatures = signatures(self::data::secret("Test", algorithm));
        let mut request = self::data::get_request();
        signatures.sign("Test", &mut request).unwrap();

        let tampered = flip_signature_bit(&signature_header(&request), 0);
        request
            .headers_mut()
            .insert("signature", tampered.parse().unwrap());

        let err = signatures.verify(&request).unwrap_err();
        assert!(
            matches!(err, Error::Verify { .. }),
            "{algorithm}: unexpected error {err:?}"
        );
    }
}

#[test]
fn tampered_header_fails() {
    let signatures = signatures(self::data::secret("Test", "RSA-SHA256"));
    let mut request = self::data::get_request();
    signatures.sign("Test", &mut request).unwrap();

    request
        .headers_mut()
        .insert("host", "evil.example.com".parse().unwrap());

    let err = signatures.verify(&request).unwrap_err();
    assert!(matches!(
        err,
        Error::Verify {
            source: CryptoError::Verification,
            ..
        }
    ));
}

/// Replace the `expires` parameter of a signed header
fn with_expires(header: &str, expires: u64) -> String {
    let parsed = cavage::parse(header).unwrap();
    cavage::serialise(&cavage::SignatureHeader {
        expires: Some(expires),
        ..parsed
    })
}

#[test]
fn uncovered_expires_out_of_clock_range() {
    let mut signatures = signatures(self::data::secret("Test", "HMAC-SHA256"));
    signatures.set_default_headers(["host", "date"]);
    let mut request = self::data::get_request();
    signatures.sign("Test", &mut request).unwrap();
    let signed = signature_header(&request);

    let largest = with_expires(&signed, i64::MAX.unsigned_abs());
    request
        .headers_mut()
        .insert("signature", largest.parse().unwrap());
    let verified = signatures.verify(&request).unwrap();
    assert!(!verified.is_expired(SystemTime::now()));

    let overflowing = with_expires(&signed, u64::MAX);
    request
        .headers_mut()
        .insert("signature", overflowing.parse().unwrap());
    let Error::Parse(err) = signatures.verify(&request).unwrap_err() else {
        panic!("expected parse error");
    };
    assert_eq!(err.message(), "wrong 'expires' param value");
}

#[test]
fn sign_sets_timestamps() {
    let mut signatures = signatures(self::data::secret("Test", "HMAC-SHA256"));
    signatures.set_default_headers(["(created)", "(expires)"]);
    signatures.set_expires_in(Some(Duration::from_secs(300)));

    let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_402_170_695);
    let mut request = self::data::get_request();
    signatures.sign_at("Test", &mut request, now).unwrap();

    let header = signature_header(&request);
    let parsed = cavage::parse(&header).unwrap();
    assert_eq!(parsed.key_id, "Test");
    assert_eq!(parsed.algorithm, Some("HMAC-SHA256"));
    assert_eq!(parsed.created, Some(1_402_170_695));
    assert_eq!(parsed.expires, Some(1_402_170_995));
    assert_eq!(parsed.headers, ["(created)", "(expires)"]);

    let verified = signatures.verify(&request).unwrap();
    assert_eq!(verified.created_at(), Some(now));
    assert!(!verified.is_expired(now));
    assert!(verified.is_expired(now + Duration::from_secs(301)));
}

#[test]
fn sign_inserts_missing_date_and_digest() {
    let signatures = signatures(self::data::secret("Test", "HMAC-SHA512"));
    let mut request = self::data::get_request();
    request.headers_mut().remove(DATE);
    request.headers_mut().remove("digest");

    let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_389_057_100);
    signatures.sign_at("Test", &mut request, now).unwrap();

    assert_eq!(request.headers()[DATE], "Tue, 07 Jan 2014 01:11:40 GMT");
    assert_eq!(
        request.headers()["digest"],
        "SHA-256=X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE="
    );
    signatures.verify(&request).unwrap();
}

#[test]
fn covered_digest_is_verified() {
    let signatures = signatures(self::data::secret("Test", "HMAC-SHA256"));
    let mut request = self::data::get_request();
    signatures.sign("Test", &mut request).unwrap();

    *request.body_mut() = br#"{"hello": "there"}"#.to_vec();

    let err = signatures.verify(&request).unwrap_err();
    assert_eq!(err.to_string(), "wrong digest: wrong hash");
}

#[test]
fn digest_verification_can_be_disabled() {
    let mut signatures = signatures(self::data::secret("Test", "HMAC-SHA256"));
    signatures.set_verify_digest(false);

    let mut request = self::data::get_request();
    signatures.sign("Test", &mut request).unwrap();
    *request.body_mut() = br#"{"hello": "there"}"#.to_vec();

    signatures.verify(&request).unwrap();
}

#[test]
fn authorization_header() {
    let mut signatures = signatures(self::data::secret("Test", "ED25519"));
    signatures.set_signature_header(SignatureHeaderKind::Authorization);

    let mut request = self::data::get_request();
    signatures.sign("Test", &mut request).unwrap();

    assert!(!request.headers().contains_key("signature"));
    let authorization = request.headers()[AUTHORIZATION].to_str().unwrap();
    assert!(authorization.starts_with("Signature keyId=\"Test\""));

    let verified = signatures.verify(&request).unwrap();
    assert_eq!(verified.algorithm, "ED25519");
}

#[test]
fn malformed_authorization_header() {
    let signatures = signatures(self::data::secret("Test", "HMAC-SHA256"));
    let mut request = self::data::get_request();
    request
        .headers_mut()
        .insert(AUTHORIZATION, "Bearer token".parse().unwrap());

    let Error::Parse(err) = signatures.verify(&request).unwrap_err() else {
        panic!("expected parse error");
    };
    assert_eq!(
        err.message(),
        "invalid Authorization header, must start from Signature keyword"
    );
}

#[test]
fn response_signature() {
    let mut signatures = signatures(self::data::secret("Test", "RSA-SHA256"));
    signatures.set_default_headers(["(created)", "date", "content-type", "digest"]);

    let mut response = self::data::get_response();
    signatures.sign("Test", &mut response).unwrap();
    signatures.verify(&response).unwrap();
}

#[test]
fn response_without_request_target() {
    let signatures = signatures(self::data::secret("Test", "RSA-SHA256"));
    let mut response = self::data::get_response();

    let err = signatures.sign("Test", &mut response).unwrap_err();
    assert_eq!(err.to_string(), "message has no request target");
}

#[test]
fn missing_signature_header() {
    let signatures = signatures(self::data::secret("Test", "HMAC-SHA256"));
    let request = self::data::get_request();

    assert!(matches!(
        signatures.verify(&request).unwrap_err(),
        Error::MissingSignatureHeader
    ));
}

#[test]
fn missing_key_id() {
    let signatures = signatures(self::data::secret("Test", "HMAC-SHA256"));
    let mut request = self::data::get_request();
    request.headers_mut().insert(
        "signature",
        r#"algorithm="hmac-sha256",signature="c2lnbmF0dXJl""#
            .parse()
            .unwrap(),
    );

    let err = signatures.verify(&request).unwrap_err();
    assert_eq!(err.to_string(), "keyId is not set in header");
}

#[test]
fn unknown_key_id() {
    let signatures = signatures(self::data::secret("Test", "HMAC-SHA256"));
    let mut request = self::data::get_request();
    request.headers_mut().insert(
        "signature",
        r#"keyId="Other",headers="host",signature="c2lnbmF0dXJl""#
            .parse()
            .unwrap(),
    );

    let Error::Secret { key_id, source } = signatures.verify(&request).unwrap_err() else {
        panic!("expected secret error");
    };
    assert_eq!(key_id, "Other");
    assert!(source.downcast_ref::<SecretNotFound>().is_some());
}

#[test]
fn unsupported_signature_algorithm() {
    let mut signatures = signatures(
        Secret::builder()
            .key_id("Test")
            .shared_key(b"secret".to_vec())
            .build()
            .unwrap(),
    );
    signatures.set_algorithm_policy(AlgorithmPolicy::PreferHeader);

    let mut request = self::data::get_request();
    request.headers_mut().insert(
        "signature",
        r#"keyId="Test",algorithm="rsa-md5",headers="host",signature="c2lnbmF0dXJl""#
            .parse()
            .unwrap(),
    );

    let err = signatures.verify(&request).unwrap_err();
    assert_eq!(err.to_string(), "unsupported signature algorithm 'rsa-md5'");
}

#[test]
fn require_matching_algorithm() {
    let mut signatures = signatures(self::data::secret("Test", "HMAC-SHA256"));
    signatures.set_algorithm_policy(AlgorithmPolicy::RequireMatch);

    let mut request = self::data::get_request();
    signatures.sign("Test", &mut request).unwrap();
    signatures.verify(&request).unwrap();

    let header = signature_header(&request);
    let parsed = cavage::parse(&header).unwrap();
    let forged = cavage::serialise(&cavage::SignatureHeader {
        algorithm: Some("HMAC-SHA512"),
        ..parsed
    });
    request
        .headers_mut()
        .insert("signature", forged.parse().unwrap());

    assert!(matches!(
        signatures.verify(&request).unwrap_err(),
        Error::AlgorithmMismatch { .. }
    ));
}

#[test]
fn default_algorithm_without_hints() {
    let key = Secret::builder()
        .key_id("Test")
        .private_key(self::data::RSA_PRIVATE_KEY)
        .build()
        .unwrap();
    let signatures = signatures(key);

    let mut request = self::data::get_request();
    signatures.sign("Test", &mut request).unwrap();

    let header = signature_header(&request);
    assert_eq!(cavage::parse(&header).unwrap().algorithm, Some("RSA-SHA256"));

    // Public key is derived from the private key
    signatures.verify(&request).unwrap();
}

#[test]
fn from_configuration() {
    let config = Configuration::from_toml(
        r#"
        [digest]
        default-algorithm = "SHA-512"

        [signature]
        default-algorithm = "HMAC-SHA256"
        default-headers = ["(request-target)", "digest"]
        expires-in = 60
        header = "authorization"
        "#,
    )
    .unwrap();

    let key = Secret::builder()
        .key_id("Test")
        .shared_key(b"secret".to_vec())
        .build()
        .unwrap();
    let signatures =
        HttpSignatures::from_configuration(HashMap::from([("Test".to_owned(), key)]), &config)
            .unwrap();

    let mut request = self::data::get_request();
    request.headers_mut().remove("digest");
    signatures.sign("Test", &mut request).unwrap();

    let digest = request.headers()["digest"].to_str().unwrap();
    assert!(digest.starts_with("SHA-512="));

    let verified = signatures.verify(&request).unwrap();
    assert_eq!(verified.algorithm, "HMAC-SHA256");
    assert!(verified.expires.is_some());
}

#[test]
fn invalid_configuration() {
    let config = Configuration::from_toml(
        r#"
        [signature]
        default-algorithm = "RSA-MD5"
        "#,
    )
    .unwrap();

    let result = HttpSignatures::from_configuration(HashMap::<String, Secret>::new(), &config);
    assert!(matches!(result, Err(Error::UnsupportedAlgorithm(..))));
}

proptest! {
    #[test]
    fn any_flipped_bit_fails(bit in 0..256_usize) {
        let signatures = signatures(self::data::secret("Test", "HMAC-SHA256"));
        let mut request = self::data::get_request();
        signatures.sign("Test", &mut request).unwrap();

        let tampered = flip_signature_bit(&signature_header(&request), bit);
        request
            .headers_mut()
            .insert("signature", tampered.parse().unwrap());

        let is_verify_error = matches!(signatures.verify(&request), Err(Error::Verify { .. }));
        prop_assert!(is_verify_error);
    }
}
