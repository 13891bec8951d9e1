use crate::args::{KeyArgs, RequestArgs};
use http::Request;
use httpsig::Secret;
use miette::{IntoDiagnostic, WrapErr};
use owo_colors::{OwoColorize, Stream};
use std::{fmt::Display, fs, path::Path};

#[inline]
pub fn error_kaomoji() -> impl Display {
    "(┬┬﹏┬┬)".if_supports_color(Stream::Stdout, |text| text.red())
}

#[inline]
pub fn success_kaomoji() -> impl Display {
    "(^///^)".if_supports_color(Stream::Stdout, |text| text.green())
}

fn read_to_string(path: &Path) -> miette::Result<String> {
    fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))
}

pub fn read_body(path: &Path) -> miette::Result<Vec<u8>> {
    fs::read(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))
}

pub fn build_request(args: &RequestArgs) -> miette::Result<Request<Vec<u8>>> {
    let body = match args.body {
        Some(ref path) => read_body(path)?,
        None => Vec::new(),
    };

    let mut builder = Request::builder()
        .method(args.method.as_str())
        .uri(args.uri.as_str());

    for header in &args.headers {
        let Some((name, value)) = header.split_once(':') else {
            miette::bail!("Header '{header}' isn't in 'name: value' form");
        };
        builder = builder.header(name.trim(), value.trim());
    }

    builder
        .body(body)
        .into_diagnostic()
        .wrap_err("Invalid request")
}

pub fn load_secret(args: &KeyArgs) -> miette::Result<Secret> {
    let mut builder = Secret::builder();
    builder.key_id(args.key_id.as_str());

    if let Some(ref path) = args.private_key {
        builder.private_key(read_to_string(path)?);
    }

    if let Some(ref path) = args.public_key {
        builder.public_key(read_to_string(path)?);
    }

    if let Some(ref shared_key) = args.shared_key {
        builder.shared_key(shared_key.as_bytes().to_vec());
    }

    if let Some(ref algorithm) = args.algorithm {
        builder.algorithm(algorithm.as_str());
    }

    builder.build().into_diagnostic()
}
