use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xwt::XwtConfig;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "xwt", version, about = "Signed binary token CLI")]
struct Cli {
    /// Path to an xwt.yaml configuration file
    #[arg(long, global = true, env = "XWT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Mint, inspect and verify tokens
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new Ed25519 keypair and print it as hex
    Generate,
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Mint a new signed token
    Mint {
        /// Hex-encoded private key, or a path to a file containing one
        #[arg(long, env = "XWT_PRIVATE_KEY", hide_env_values = true)]
        key: Option<String>,

        /// Token id (subject)
        #[arg(long)]
        id: String,

        /// Lifetime from now, e.g. "24h", "7d", "30m"
        #[arg(long)]
        expires: Option<String>,

        /// Absolute expiry in Unix seconds
        #[arg(long, conflicts_with = "expires")]
        expires_at: Option<i64>,
    },

    /// Print a token's fields without verifying it
    Inspect {
        /// Hex-encoded token, or a path to a file containing one
        token: String,

        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Verify a token's signature and expiry
    Verify {
        /// Hex-encoded public key, or a path to a file containing one
        #[arg(long, env = "XWT_PUBLIC_KEY")]
        public_key: Option<String>,

        /// Grace period past expiry, e.g. "30s", "5m"
        #[arg(long)]
        grace: Option<String>,

        /// Hex-encoded token, or a path to a file containing one
        token: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading configuration");
            XwtConfig::load(path)?
        }
        None => XwtConfig::default(),
    };

    match cli.cmd {
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate => commands::keys::generate()?,
        },

        Command::Token { cmd } => match cmd {
            TokenCommand::Mint {
                key,
                id,
                expires,
                expires_at,
            } => commands::token::mint(&config, key, id, expires, expires_at)?,

            TokenCommand::Inspect { token, json } => commands::token::inspect(token, json)?,

            TokenCommand::Verify {
                public_key,
                grace,
                token,
            } => commands::token::verify(&config, public_key, grace, token)?,
        },
    }

    Ok(())
}
