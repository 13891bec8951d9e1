use super::SignatureHeader;
use itertools::Itertools;
use std::fmt::Write;

/// Format a signature header into its textual form
///
/// Emits the `Signature ` keyword prefix when the header has a keyword (`Authorization` headers)
#[inline]
#[must_use]
pub fn serialise(header: &SignatureHeader<'_>) -> String {
    let mut buffer = String::new();

    if let Some(keyword) = header.keyword {
        buffer.push_str(keyword);
        buffer.push(' ');
    }

    let _ = write!(buffer, "keyId=\"{}\"", header.key_id);

    if let Some(algorithm) = header.algorithm {
        let _ = write!(buffer, ",algorithm=\"{algorithm}\"");
    }

    if let Some(created) = header.created {
        let _ = write!(buffer, ",created={created}");
    }

    if let Some(expires) = header.expires {
        let _ = write!(buffer, ",expires={expires}");
    }

    let _ = write!(buffer, ",headers=\"{}\"", header.headers.iter().join(" "));
    let _ = write!(buffer, ",signature=\"{}\"", header.signature);

    buffer
}
