use crate::{
    args::{DigestCreateArgs, DigestSubcommand, DigestVerifyArgs},
    util::{self, success_kaomoji},
};
use httpsig::{
    config::Configuration,
    digest::{Digest, DigestError},
};

fn digest(config: &Configuration) -> miette::Result<Digest> {
    let mut digest = Digest::new();
    digest.set_default_hash_algorithm(&config.digest.default_algorithm)?;
    Ok(digest)
}

fn create(config: &Configuration, args: DigestCreateArgs) -> miette::Result<()> {
    let digest = digest(config)?;
    let body = util::read_body(&args.body)?;

    let header = match args.algorithm {
        Some(ref algorithm) => digest.create(algorithm, &body)?,
        None => digest.create_default(&body)?,
    };
    println!("{header}");

    Ok(())
}

fn verify(config: &Configuration, args: DigestVerifyArgs) -> miette::Result<()> {
    let digest = digest(config)?;
    let body = util::read_body(&args.body)?;

    match digest.verify_value(&args.header, &body) {
        Ok(()) => {}
        Err(DigestError::Parse(err)) => {
            return Err(miette::Report::new(err).with_source_code(args.header));
        }
        Err(err) => return Err(err.into()),
    }

    println!("✅ Digest matches! {}", success_kaomoji());

    Ok(())
}

pub fn do_it(config: &Configuration, subcommand: DigestSubcommand) -> miette::Result<()> {
    match subcommand {
        DigestSubcommand::Create(args) => create(config, args),
        DigestSubcommand::Verify(args) => verify(config, args),
    }
}
