//!
//! Utilities for handling signature strings
//!

use super::{SignatureHeader, CREATED, EXPIRES, REQUEST_TARGET};
use crate::HttpMessage;
use miette::Diagnostic;
use std::fmt::Write;
use thiserror::Error;

/// Signature string error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Header had an invalid value (non-UTF8 value)
    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::ToStrError),

    /// Covered header or pseudo-header has no value
    #[error("missing value for covered header '{0}'")]
    MissingHeaderValue(String),

    /// `(request-target)` is covered but the message isn't a request
    #[error("message has no request target")]
    MissingRequestTarget,
}

/// Construct a new signature string from a parsed signature header and an HTTP message
///
/// One `name: value` line per covered header, in order, joined by `\n` without a trailing newline
#[inline]
pub fn construct<M>(message: &M, signature_header: &SignatureHeader<'_>) -> Result<String, Error>
where
    M: HttpMessage + ?Sized,
{
    let mut signature_string = String::new();
    for name in &signature_header.headers {
        match *name {
            name @ REQUEST_TARGET => {
                let (method, uri) = message
                    .request_target()
                    .ok_or(Error::MissingRequestTarget)?;
                let method = method.as_str().to_lowercase();
                let path_and_query = uri
                    .path_and_query()
                    .map_or_else(|| uri.path(), |path_and_query| path_and_query.as_str());

                let _ = writeln!(signature_string, "{name}: {method} {path_and_query}");
            }
            name @ CREATED => {
                let created = signature_header
                    .created
                    .ok_or_else(|| Error::MissingHeaderValue(name.to_owned()))?;
                let _ = writeln!(signature_string, "{name}: {created}");
            }
            name @ EXPIRES => {
                let expires = signature_header
                    .expires
                    .ok_or_else(|| Error::MissingHeaderValue(name.to_owned()))?;
                let _ = writeln!(signature_string, "{name}: {expires}");
            }
            header => {
                let name = header.to_lowercase();
                let mut values = message.headers().get_all(name.as_str()).iter().peekable();
                if values.peek().is_none() {
                    return Err(Error::MissingHeaderValue(name));
                }

                let _ = write!(signature_string, "{name}: ");
                for (idx, value) in values.enumerate() {
                    if idx > 0 {
                        signature_string.push_str(", ");
                    }
                    signature_string.push_str(value.to_str()?);
                }
                signature_string.push('\n');
            }
        }
    }

    // Remove the last new-line
    signature_string.pop();

    Ok(signature_string)
}
