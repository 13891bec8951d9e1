use self::args::{ToolArgs, ToolSubcommand};
use clap::Parser;
use httpsig::config::Configuration;
use miette::{IntoDiagnostic, WrapErr};
use std::{env, fs, io, path::Path};
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    layer::SubscriberExt,
    Layer, Registry,
};

mod args;
mod digest;
mod parse_header;
mod sign;
mod util;

fn initialise_logging() -> miette::Result<()> {
    let env_filter = env::var("RUST_LOG")
        .into_diagnostic()
        .and_then(|targets| {
            targets
                .parse()
                .into_diagnostic()
                .wrap_err("Failed to parse RUST_LOG value")
        })
        .unwrap_or_else(|_| Targets::default().with_default(LevelFilter::INFO));

    let subscriber = Registry::default().with(
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_filter(env_filter),
    );

    tracing::subscriber::set_global_default(subscriber)
        .into_diagnostic()
        .wrap_err("Couldn't install the global tracing subscriber")?;

    Ok(())
}

fn load_configuration(path: Option<&Path>) -> miette::Result<Configuration> {
    let Some(path) = path else {
        return Ok(Configuration::default());
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "configuration file not found, using defaults");
            return Ok(Configuration::default());
        }
        Err(err) => {
            return Err(err)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to read {}", path.display()))
        }
    };

    Configuration::from_toml(&content)
        .into_diagnostic()
        .wrap_err("Failed to parse configuration")
}

fn main() -> miette::Result<()> {
    initialise_logging()?;

    let args = ToolArgs::parse();
    let config = load_configuration(args.config.as_deref())?;

    match args.subcommand {
        ToolSubcommand::ParseHeader(args) => parse_header::do_it(&args.header, args.kind),
        ToolSubcommand::Digest(subcommand) => digest::do_it(&config, subcommand),
        ToolSubcommand::Sign(args) => sign::sign(&config, &args),
        ToolSubcommand::Verify(args) => sign::verify(&config, &args),
    }
}
