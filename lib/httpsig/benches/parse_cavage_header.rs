use criterion::{criterion_group, criterion_main, Criterion};
use httpsig::cavage;
use std::hint::black_box;

const CAVAGE_HEADER_1: &str = r#"keyId="Test",algorithm="rsa-sha256",headers="(request-target) host date",signature="qdx+H7PHHDZgy4y/Ahn9Tny9V3GP6YgBPyUXMmoxWtLbHpUnXS2mg2+SbrQDMCJypxBLSPQR2aAjn7ndmw2iicw3HMbe8VfEdKFYRqzic+efkb3nndiv/x1xSHDJWeSWkx3ButlYSuBskLu6kd9Fswtemr3lgdDEmn04swr2Os0=""#;
const CAVAGE_HEADER_2: &str = r#"Signature keyId="Test",algorithm="rsa-sha256",created=1402170695, expires=1402170699,headers="(request-target) (created) (expires) host date content-type digest content-length",signature="vSdrb+dS3EceC9bcwHSo4MlyKS59iFIrhgYkz8+oVLEEzmYZZvRs8rgOp+63LEM3v+MFHB32NfpB2bEKBIvB1q52LaEUHFv120V01IL+TAD48XaERZFukWgHoBTLMhYS2Gb51gWxpeIq8knRmPnYePbF5MOkR0Zkly4zKH7s1dE=""#;
const DIGEST_HEADER: &str = "SHA-256=X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE=";

fn signature_header(c: &mut Criterion) {
    c.bench_function("parse_signature_header", |b| {
        b.iter(|| {
            let _ = black_box(cavage::parse(black_box(CAVAGE_HEADER_1)));
        });
    });
}

fn authorization_header(c: &mut Criterion) {
    c.bench_function("parse_authorization_header", |b| {
        b.iter(|| {
            let _ = black_box(cavage::parse_authorization(black_box(CAVAGE_HEADER_2)));
        });
    });
}

fn digest_header(c: &mut Criterion) {
    c.bench_function("parse_digest_header", |b| {
        b.iter(|| {
            let _ = black_box(cavage::parse_digest(black_box(DIGEST_HEADER)));
        });
    });
}

criterion_group!(
    parse_cavage_header,
    signature_header,
    authorization_header,
    digest_header
);
criterion_main!(parse_cavage_header);
