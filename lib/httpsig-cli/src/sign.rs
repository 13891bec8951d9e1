use crate::{
    args::{SignArgs, VerifyArgs},
    util::{self, error_kaomoji, success_kaomoji},
};
use httpsig::{config::Configuration, HttpSignatures, Secret};
use std::{collections::HashMap, time::SystemTime};

fn signatures(
    config: &Configuration,
    secret: Secret,
) -> miette::Result<HttpSignatures<HashMap<String, Secret>>> {
    let secrets = HashMap::from([(secret.key_id().to_owned(), secret)]);
    Ok(HttpSignatures::from_configuration(secrets, config)?)
}

pub fn sign(config: &Configuration, args: &SignArgs) -> miette::Result<()> {
    let secret = util::load_secret(&args.key)?;
    let key_id = secret.key_id().to_owned();
    let signatures = signatures(config, secret)?;

    let mut request = util::build_request(&args.request)?;
    let original = request.headers().clone();
    signatures.sign(&key_id, &mut request)?;

    for (name, value) in request.headers() {
        if original.get(name) != Some(value) {
            println!("{name}: {}", String::from_utf8_lossy(value.as_bytes()));
        }
    }

    Ok(())
}

pub fn verify(config: &Configuration, args: &VerifyArgs) -> miette::Result<()> {
    let secret = util::load_secret(&args.key)?;
    let signatures = signatures(config, secret)?;

    let request = util::build_request(&args.request)?;
    let verified = signatures.verify(&request)?;

    println!("✅ Signature is valid! {}", success_kaomoji());
    println!("keyId:     {}", verified.key_id);
    println!("algorithm: {}", verified.algorithm);
    if let Some(created) = verified.created {
        println!("created:   {created}");
    }
    if let Some(expires) = verified.expires {
        println!("expires:   {expires}");
    }

    if verified.is_expired(SystemTime::now()) {
        println!("⚠️ Signature has expired {}", error_kaomoji());
    }

    Ok(())
}
