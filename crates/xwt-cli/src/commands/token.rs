//! Token management commands.
//!
//! `xwt token mint` - Mint a new signed token.
//! `xwt token inspect` - Inspect a token's contents.
//! `xwt token verify` - Verify a token is valid.

use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::Path;
use xwt::keys::load_public_key_hex;
use xwt::{
    Ed25519, KeyPair, PublicKey, SignedToken, TokenIssuer, TokenVerifier, XwtConfig, parse_duration,
};

/// Read a value that is either a path to a file or the value itself.
fn read_path_or_value(value: &str) -> anyhow::Result<String> {
    let path = Path::new(value);
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(content.trim().to_string());
    }
    Ok(value.trim().to_string())
}

/// Resolve a private key from the flag, the env var or the config file.
///
/// The key string can be:
/// - A path to a file containing a hex-encoded private key
/// - A hex-encoded private key directly (e.g., from XWT_PRIVATE_KEY env var)
fn resolve_private_key(key: Option<String>, config: &XwtConfig) -> anyhow::Result<KeyPair> {
    let key_str = match key {
        Some(key) => key,
        None => config.resolve_private_key()?.context(
            "Private key not provided. Either pass --key <hex|path> or set XWT_PRIVATE_KEY env var",
        )?,
    };

    let encoded = read_path_or_value(&key_str)?;
    KeyPair::from_private_key_hex(&encoded)
        .context("Failed to parse private key. Expected hex-encoded 64 byte Ed25519 private key")
}

/// Resolve a public key from the flag, the env var or the config file.
fn resolve_public_key(key: Option<String>, config: &XwtConfig) -> anyhow::Result<PublicKey> {
    let key_str = match key {
        Some(key) => key,
        None => config.resolve_public_key()?.context(
            "Public key not provided. Either pass --public-key <hex|path> or set XWT_PUBLIC_KEY env var",
        )?,
    };

    let encoded = read_path_or_value(&key_str)?;
    load_public_key_hex::<Ed25519>(&encoded)
        .context("Failed to parse public key. Expected hex-encoded 32 byte Ed25519 public key")
}

/// Read a hex token from the argument or from the file it names.
fn read_token(token: &str) -> anyhow::Result<Vec<u8>> {
    let encoded = read_path_or_value(token)?;
    hex::decode(&encoded).context("Token is not valid hex")
}

/// Mint a new token and print it as hex.
pub fn mint(
    config: &XwtConfig,
    private_key: Option<String>,
    id: String,
    expires: Option<String>,
    expires_at: Option<i64>,
) -> anyhow::Result<()> {
    let encoded = mint_hex(config, private_key, id, expires, expires_at)?;
    println!("{}", encoded);
    Ok(())
}

fn mint_hex(
    config: &XwtConfig,
    private_key: Option<String>,
    id: String,
    expires: Option<String>,
    expires_at: Option<i64>,
) -> anyhow::Result<String> {
    let keypair = resolve_private_key(private_key, config)?;

    let lifetime = match &expires {
        Some(e) => parse_duration(e)?,
        None => config.lifetime()?,
    };
    let issuer = TokenIssuer::new(keypair, lifetime);

    let signed = match expires_at {
        Some(expires_at) => issuer.issue_until(id, expires_at)?,
        None => issuer.issue(id)?,
    };

    tracing::info!(expires = signed.expires(), "Minted token");
    Ok(hex::encode(signed.serialize()))
}

/// Token fields as printed by `inspect`.
#[derive(Debug, Serialize)]
struct TokenInfo {
    version: u8,
    expires: i64,
    expires_at: Option<String>,
    id: String,
    id_hex: String,
    signature: String,
}

impl TokenInfo {
    fn from_token(token: &SignedToken) -> Self {
        Self {
            version: token.version(),
            expires: token.expires(),
            expires_at: token.token().expires_at().map(|t| t.to_rfc3339()),
            id: String::from_utf8_lossy(token.id()).into_owned(),
            id_hex: hex::encode(token.id()),
            signature: hex::encode(token.signature()),
        }
    }
}

/// Inspect a token without verification.
pub fn inspect(token: String, json: bool) -> anyhow::Result<()> {
    let bytes = read_token(&token)?;
    let parsed = SignedToken::<Ed25519>::parse(&bytes)?;
    let info = TokenInfo::from_token(&parsed);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Token Information (unverified):");
    println!("  Version: v{}", info.version);
    match &info.expires_at {
        Some(at) => println!("  Expires: {} ({})", info.expires, at),
        None => println!("  Expires: {}", info.expires),
    }
    println!("  Id: {}", info.id);
    println!("  Id (hex): {}", info.id_hex);
    println!("  Signature: {}", info.signature);

    Ok(())
}

/// Verify a token is valid.
pub fn verify(
    config: &XwtConfig,
    public_key: Option<String>,
    grace: Option<String>,
    token: String,
) -> anyhow::Result<()> {
    let verified = verify_token(config, public_key, grace, &token)
        .context("✖ Token verification failed")?;

    println!("✔ Token is valid");
    println!();
    println!("Token Details:");
    println!("  Id: {}", String::from_utf8_lossy(verified.id()));
    println!("  Expires: {}", verified.expires());

    Ok(())
}

fn verify_token(
    config: &XwtConfig,
    public_key: Option<String>,
    grace: Option<String>,
    token: &str,
) -> anyhow::Result<SignedToken> {
    let public_key = resolve_public_key(public_key, config)?;
    let grace_period = match &grace {
        Some(g) => parse_duration(g)?,
        None => config.grace_period()?,
    };
    let verifier = TokenVerifier::<Ed25519>::new(public_key, grace_period);

    let bytes = read_token(token)?;
    Ok(verifier.verify(&bytes)?)
}
