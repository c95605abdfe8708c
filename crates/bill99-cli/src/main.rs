// Bill99 CLI - Command-line interface for the 99Bill signer

mod config;
mod params;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use bill99_sign::types::SIGNATURE_FIELD;
use bill99_sign::{DigestAlgorithm, Signer, SignerConfig};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::ConfigOverrides;

/// Bill99 - sign and verify 99Bill gateway messages
#[derive(Parser)]
#[command(name = "bill99")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Signer config file (JSON)
    #[arg(long, global = true, env = "BILL99_SIGNER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sign keys in the order given instead of the gateway schema order
    #[arg(long, global = true)]
    no_sort: bool,

    /// Encoding of the signed content (QUERY or JSON)
    #[arg(long, global = true, value_name = "POLICY")]
    policy: Option<String>,

    /// Key excluded from signing; replaces the default list (can be specified multiple times)
    #[arg(long = "ignore", global = true, value_name = "KEY")]
    ignores: Vec<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ParamsArgs {
    /// Message parameter key=value pair (can be specified multiple times)
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// JSON object file with message parameters
    #[arg(long, value_name = "FILE")]
    params_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the content that would be signed
    Canonical {
        #[command(flatten)]
        params: ParamsArgs,
    },
    /// Sign a message
    Sign {
        #[command(subcommand)]
        method: SignMethod,
    },
    /// Verify a message signature
    Verify {
        #[command(subcommand)]
        method: VerifyMethod,
    },
    /// Show the effective signer configuration
    Config,
}

#[derive(Subcommand)]
enum SignMethod {
    /// Keyed MD5 signature (uppercase hex)
    Md5 {
        /// Merchant MD5 secret
        #[arg(short, long)]
        key: String,

        #[command(flatten)]
        params: ParamsArgs,
    },
    /// RSA signature (Base64)
    Rsa {
        /// Private key: PEM file path, PEM text, or one-line Base64 body
        #[arg(long, value_name = "KEY")]
        private_key: String,

        /// Digest algorithm
        #[arg(long, default_value = "sha1")]
        alg: String,

        #[command(flatten)]
        params: ParamsArgs,
    },
}

#[derive(Subcommand)]
enum VerifyMethod {
    /// Check a keyed MD5 signature
    Md5 {
        /// Signature to check (defaults to the signMsg parameter)
        #[arg(short, long)]
        signature: Option<String>,

        /// Merchant MD5 secret
        #[arg(short, long)]
        key: String,

        #[command(flatten)]
        params: ParamsArgs,
    },
    /// Check an RSA signature
    Rsa {
        /// Signature to check (defaults to the signMsg parameter)
        #[arg(short, long)]
        signature: Option<String>,

        /// Public key: PEM file path, PEM text, or one-line Base64 body
        #[arg(long, value_name = "KEY")]
        public_key: String,

        /// Digest algorithm
        #[arg(long, default_value = "sha1")]
        alg: String,

        #[command(flatten)]
        params: ParamsArgs,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_signer_config(&cli).and_then(|signer_config| match cli.command {
        Commands::Canonical { params } => handle_canonical(&params, signer_config),
        Commands::Sign { method } => handle_sign(method, signer_config),
        Commands::Verify { method } => handle_verify(method, signer_config),
        Commands::Config => {
            println!("{}", config::summary(&signer_config));
            Ok(())
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so signatures on stdout stay pipeable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_signer_config(cli: &Cli) -> anyhow::Result<SignerConfig> {
    let loaded = config::load_config(cli.config.as_deref())?;
    let overrides = ConfigOverrides {
        no_sort: cli.no_sort,
        encode_policy: cli.policy.clone(),
        ignores: cli.ignores.clone(),
    };
    config::apply_overrides(loaded, &overrides)
}

fn build_signer(args: &ParamsArgs, config: SignerConfig) -> anyhow::Result<Signer> {
    let params = params::collect_params(args.params_file.as_deref(), &args.params)?;
    if params.is_empty() {
        return Err(anyhow!(
            "No parameters given. Use -p key=value or --params-file <FILE>"
        ));
    }
    Ok(Signer::with_config(params, config))
}

fn parse_alg(alg: &str) -> anyhow::Result<DigestAlgorithm> {
    alg.parse::<DigestAlgorithm>().map_err(Into::into)
}

fn handle_canonical(args: &ParamsArgs, config: SignerConfig) -> anyhow::Result<()> {
    let signer = build_signer(args, config)?;
    println!("{}", signer.content_to_sign()?);
    Ok(())
}

fn handle_sign(method: SignMethod, config: SignerConfig) -> anyhow::Result<()> {
    let signature = match method {
        SignMethod::Md5 { key, params } => build_signer(&params, config)?.sign_with_md5(&key)?,
        SignMethod::Rsa {
            private_key,
            alg,
            params,
        } => {
            let alg = parse_alg(&alg)?;
            build_signer(&params, config)?
                .sign_with_rsa(&private_key, alg)
                .context("RSA signing failed")?
        }
    };

    println!("{}", signature);
    Ok(())
}

fn handle_verify(method: VerifyMethod, config: SignerConfig) -> anyhow::Result<()> {
    let (verified, algorithm) = match method {
        VerifyMethod::Md5 {
            signature,
            key,
            params,
        } => {
            let signer = build_signer(&params, config)?;
            let signature = resolve_signature(signature, &signer)?;
            (signer.verify_with_md5(&signature, &key)?, "MD5".to_string())
        }
        VerifyMethod::Rsa {
            signature,
            public_key,
            alg,
            params,
        } => {
            let alg = parse_alg(&alg)?;
            let signer = build_signer(&params, config)?;
            let signature = resolve_signature(signature, &signer)?;
            let verified = signer
                .verify_with_rsa(&signature, &public_key, alg)
                .context("RSA verification failed")?;
            (verified, format!("RSA-{}", alg))
        }
    };

    report_verification(verified, &algorithm)
}

/// Uses the explicit signature, or the signMsg parameter of the message.
fn resolve_signature(explicit: Option<String>, signer: &Signer) -> anyhow::Result<String> {
    explicit
        .or_else(|| signer.params().get(SIGNATURE_FIELD).map(str::to_string))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("No signature given. Use --signature or pass {}", SIGNATURE_FIELD))
}

fn report_verification(verified: bool, algorithm: &str) -> anyhow::Result<()> {
    use colored::Colorize;

    if verified {
        println!("{} {}", "✓".green().bold(), "Signature verified".green());
        println!("  Algorithm: {}", algorithm);
        Ok(())
    } else {
        eprintln!("{} {}", "✗".red().bold(), "Signature verification failed".red());
        eprintln!("  Algorithm: {}", algorithm);
        Err(anyhow!("signature does not match the message"))
    }
}
