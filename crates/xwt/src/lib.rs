//! # xwt
//!
//! Compact binary tokens authenticated by a public-key signature.
//!
//! This crate provides functionality for:
//! - Generating Ed25519 keypairs for token signing
//! - Encoding a token's fields into a fixed-layout canonical form
//! - Signing, serializing and parsing tokens
//! - Verifying a token's signature and expiry against a public key
//!
//! ## Wire Format
//!
//! | Field     | Width     | Encoding                               |
//! |-----------|-----------|----------------------------------------|
//! | signature | 64        | detached Ed25519 signature             |
//! | version   | 2         | ASCII `"v1"`                           |
//! | expires   | 10        | ASCII decimal Unix seconds, zero-padded |
//! | id        | remaining | opaque bytes                           |
//!
//! The signature covers everything after it. Any holder of the public key can
//! check a token without contacting the issuer.
//!
//! ```
//! use chrono::Duration;
//! use xwt::{Ed25519, KeyPair, SignedToken, Token};
//!
//! let keypair = KeyPair::<Ed25519>::generate()?;
//! let bytes = Token::v1(9_999_999_999, "user:12345")?.sign(&keypair)?.serialize();
//!
//! let parsed = SignedToken::<Ed25519>::parse(&bytes)?;
//! parsed.verify(keypair.public_key(), Duration::zero())?;
//! assert_eq!(parsed.id(), b"user:12345");
//! # Ok::<(), xwt::XwtError>(())
//! ```

pub mod algorithm;
pub mod codec;
pub mod config;
pub mod error;
pub mod keys;
pub mod token;

pub use ed25519_dalek::VerifyingKey as PublicKey;

pub use algorithm::{Ed25519, SignatureAlgorithm};
pub use config::{XwtConfig, parse_duration};
pub use error::XwtError;
pub use keys::KeyPair;
pub use token::{SignedToken, Token, TokenIssuer, TokenVerifier};
