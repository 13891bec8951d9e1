use crate::{args::HeaderKind, util::success_kaomoji};
use httpsig::cavage::{self, ParseError, SignatureHeader};

fn report(header: &str, err: ParseError) -> miette::Report {
    miette::Report::new(err).with_source_code(header.to_owned())
}

fn print_signature(header: &SignatureHeader<'_>) {
    println!("keyId:     {}", header.key_id);
    println!("algorithm: {}", header.algorithm.unwrap_or("-"));
    if let Some(created) = header.created {
        println!("created:   {created}");
    }
    if let Some(expires) = header.expires {
        println!("expires:   {expires}");
    }
    println!("headers:   {}", header.headers.join(" "));
}

pub fn do_it(header: &str, kind: HeaderKind) -> miette::Result<()> {
    match kind {
        HeaderKind::Authorization => {
            let parsed = cavage::parse_authorization(header).map_err(|err| report(header, err))?;
            print_signature(&parsed);
        }
        HeaderKind::Signature => {
            let parsed = cavage::parse(header).map_err(|err| report(header, err))?;
            print_signature(&parsed);
        }
        HeaderKind::Digest => {
            let parsed = cavage::parse_digest(header).map_err(|err| report(header, err))?;
            println!("algorithm: {}", parsed.algorithm);
            println!("digest:    {}", parsed.digest);
        }
    }

    println!("✅ Header is valid! {}", success_kaomoji());

    Ok(())
}
