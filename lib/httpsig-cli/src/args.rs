use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Copy, PartialEq, ValueEnum)]
pub enum HeaderKind {
    /// `Authorization: Signature keyId=...`
    Authorization,

    /// `Signature: keyId=...`
    Signature,

    /// `Digest: SHA-256=...`
    Digest,
}

#[derive(Args)]
pub struct ParseHeaderArgs {
    /// The header value to parse
    pub header: String,

    /// The header this value belongs to
    #[arg(
        default_value_t = HeaderKind::Signature,
        long,
        short,
        value_enum,
    )]
    pub kind: HeaderKind,
}

#[derive(Args)]
pub struct DigestCreateArgs {
    /// Hash algorithm to use (defaults to the configured one)
    #[arg(long, short)]
    pub algorithm: Option<String>,

    /// File containing the body
    pub body: PathBuf,
}

#[derive(Args)]
pub struct DigestVerifyArgs {
    /// The `Digest` header value
    pub header: String,

    /// File containing the body
    pub body: PathBuf,
}

#[derive(Subcommand)]
pub enum DigestSubcommand {
    /// Hash a body and print the `Digest` header value
    Create(DigestCreateArgs),

    /// Verify a `Digest` header value against a body
    Verify(DigestVerifyArgs),
}

#[derive(Args)]
pub struct RequestArgs {
    /// Request method
    #[arg(long, short, default_value = "GET")]
    pub method: String,

    /// Request target (path and query)
    #[arg(long, short, default_value = "/")]
    pub uri: String,

    /// Request header in `name: value` form, can be repeated
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// File containing the request body
    #[arg(long, short)]
    pub body: Option<PathBuf>,
}

#[derive(Args)]
pub struct KeyArgs {
    /// Identifier of the key
    #[arg(long, short)]
    pub key_id: String,

    /// PEM file with the private key
    #[arg(long)]
    pub private_key: Option<PathBuf>,

    /// PEM file with the public key
    #[arg(long)]
    pub public_key: Option<PathBuf>,

    /// Shared key for the HMAC algorithms
    #[arg(long)]
    pub shared_key: Option<String>,

    /// Algorithm the key is meant for
    #[arg(long, short)]
    pub algorithm: Option<String>,
}

#[derive(Args)]
pub struct SignArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub key: KeyArgs,
}

#[derive(Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub key: KeyArgs,
}

#[derive(Subcommand)]
pub enum ToolSubcommand {
    /// Parse a signature or digest header and report any format errors
    ParseHeader(ParseHeaderArgs),

    /// Create or verify `Digest` headers
    #[command(subcommand)]
    Digest(DigestSubcommand),

    /// Sign a request and print the headers that were added
    Sign(SignArgs),

    /// Verify the signature of a request
    Verify(VerifyArgs),
}

#[derive(Parser)]
#[command(about, version)]
pub struct ToolArgs {
    /// Path to the TOML configuration, defaults apply if the file doesn't exist
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub subcommand: ToolSubcommand,
}
