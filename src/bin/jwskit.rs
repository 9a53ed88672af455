//! Command-line surface for JWK generation, parsing and format conversion.

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

use std::{
    fs,
    io::{self, Read as _},
    path::PathBuf,
    process::ExitCode,
};

use jws_kit::{
    jwa::{EllipticCurve, KeyType},
    jwk::{GenerateOptions, JsonWebKey, JwkSet},
};

#[derive(Debug, Parser)]
#[command(name = "jwskit", version, about = "Work with JWS keys and messages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Work with JWK and JWK sets.
    #[command(subcommand)]
    Jwk(JwkCommands),
}

#[derive(Debug, Subcommand)]
enum JwkCommands {
    /// Generate a new JWK private key.
    Generate(GenerateArgs),
    /// Parse a JWK or JWK set and re-emit it as JSON.
    Parse(IoArgs),
    /// Convert a JWK or JWK set between JSON and PEM.
    Format(IoArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Key type: RSA, EC, OKP or oct.
    #[arg(long = "type", value_name = "TYPE")]
    key_type: String,

    /// Elliptic curve (P-256 / P-384 / P-521 for EC, Ed25519 / X25519 for
    /// OKP).
    #[arg(long, value_name = "CURVE")]
    curve: Option<String>,

    /// Key size in bits (RSA modulus or oct length).
    #[arg(long, value_name = "N")]
    bits: Option<usize>,

    /// Extra JWK members as a JSON object, merged into the generated key.
    #[arg(long, value_name = "JSON")]
    template: Option<String>,

    /// Emit a JWK set even for the single generated key.
    #[arg(long)]
    set: bool,
}

#[derive(Debug, Args)]
struct IoArgs {
    /// Input file; omit together with --stdin to read standard input.
    file: Option<PathBuf>,

    /// Wire format: the input format for `parse`, the output format for
    /// `format`.
    #[arg(long, value_enum, default_value = "json")]
    format: Format,

    /// Keep the JWK set envelope even when it holds a single key.
    #[arg(long)]
    preserve_set: bool,

    /// Read from standard input instead of a file.
    #[arg(long)]
    stdin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Pem,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::builder().with_default_directive("warn".parse().expect("valid directive")).from_env_lossy())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Jwk(JwkCommands::Generate(args)) => generate(args),
        Commands::Jwk(JwkCommands::Parse(args)) => parse(args),
        Commands::Jwk(JwkCommands::Format(args)) => format(args),
    }
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let key_type: KeyType = args.key_type.parse()?;
    let curve = args
        .curve
        .as_deref()
        .map(str::parse::<EllipticCurve>)
        .transpose()?;
    let template = args
        .template
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("template is not a JSON object")?;

    let jwk = JsonWebKey::generate(
        key_type,
        GenerateOptions {
            curve,
            bits: args.bits,
            template,
        },
    )?;
    let set = JwkSet { keys: vec![jwk] };
    dump_set(&set, args.set)
}

fn parse(args: IoArgs) -> anyhow::Result<()> {
    let input = read_source(&args)?;
    let set = match args.format {
        Format::Json => JwkSet::parse(&input)?,
        Format::Pem => JwkSet::parse_pem(&input)?,
    };
    dump_set(&set, args.preserve_set)
}

fn format(args: IoArgs) -> anyhow::Result<()> {
    let input = read_source(&args)?;
    let set = JwkSet::parse(&input)?;
    match args.format {
        Format::Json => dump_set(&set, args.preserve_set),
        Format::Pem => {
            print!("{}", set.to_pem()?);
            Ok(())
        }
    }
}

fn read_source(args: &IoArgs) -> anyhow::Result<Vec<u8>> {
    match (&args.file, args.stdin) {
        (Some(path), false) => {
            fs::read(path).with_context(|| format!("cannot read {}", path.display()))
        }
        (None, _) | (Some(_), true) => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("cannot read standard input")?;
            Ok(buf)
        }
    }
}

fn dump_set(set: &JwkSet, preserve_set: bool) -> anyhow::Result<()> {
    let value = set.to_json_value(preserve_set);
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
