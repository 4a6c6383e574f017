//! Key management commands.
//!
//! `xwt keys generate` - Generate a new Ed25519 keypair.

use xwt::KeyPair;

/// Generate a new keypair and print both halves as hex.
pub fn generate() -> anyhow::Result<()> {
    let keypair = generate_keypair()?;

    println!("Private key (keep secure!):");
    println!("{}", keypair.private_key_hex());
    println!();
    println!("Public key:");
    println!("{}", keypair.public_key_hex());
    println!();
    println!("Set as environment variables:");
    println!("  export XWT_PRIVATE_KEY={}", keypair.private_key_hex());
    println!("  export XWT_PUBLIC_KEY={}", keypair.public_key_hex());

    Ok(())
}

fn generate_keypair() -> anyhow::Result<KeyPair> {
    Ok(KeyPair::generate()?)
}
