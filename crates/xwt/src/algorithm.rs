//! Signature algorithms.
//!
//! Token framing only depends on the widths published by a
//! [`SignatureAlgorithm`]; the primitive itself stays behind the trait so a
//! different scheme can be dropped in without touching the codec.

use crate::error::XwtError;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;

/// A public-key signature scheme with fixed key and signature widths.
pub trait SignatureAlgorithm {
    /// Human-readable algorithm name.
    const NAME: &'static str;
    /// Number of random bytes consumed to derive a private key.
    const SEED_LENGTH: usize;
    /// Width of a serialized public key.
    const PUBLIC_KEY_LENGTH: usize;
    /// Width of a serialized private key.
    const PRIVATE_KEY_LENGTH: usize;
    /// Width of a detached signature.
    const SIGNATURE_LENGTH: usize;

    type PublicKey: Clone + PartialEq + fmt::Debug;
    type PrivateKey: Clone;

    /// Derive a private key from `SEED_LENGTH` bytes of entropy.
    fn private_key_from_seed(seed: &[u8]) -> Result<Self::PrivateKey, XwtError>;

    /// Load a private key from its `PRIVATE_KEY_LENGTH` byte form.
    fn private_key_from_bytes(bytes: &[u8]) -> Result<Self::PrivateKey, XwtError>;

    /// Load a public key from its `PUBLIC_KEY_LENGTH` byte form.
    fn public_key_from_bytes(bytes: &[u8]) -> Result<Self::PublicKey, XwtError>;

    fn public_key(private_key: &Self::PrivateKey) -> Self::PublicKey;

    fn private_key_bytes(private_key: &Self::PrivateKey) -> Vec<u8>;

    fn public_key_bytes(public_key: &Self::PublicKey) -> Vec<u8>;

    /// Produce a detached signature over `message`.
    fn sign(private_key: &Self::PrivateKey, message: &[u8]) -> Vec<u8>;

    /// Check a detached signature.
    fn verify(public_key: &Self::PublicKey, message: &[u8], signature: &[u8]) -> bool;

    /// Attached mode: returns `signature || message`.
    fn sign_attached(private_key: &Self::PrivateKey, message: &[u8]) -> Vec<u8> {
        let mut signed = Self::sign(private_key, message);
        signed.extend_from_slice(message);
        signed
    }

    /// Open an attached `signature || message`, returning the message if the
    /// signature checks out.
    fn open<'a>(public_key: &Self::PublicKey, signed: &'a [u8]) -> Option<&'a [u8]> {
        if signed.len() < Self::SIGNATURE_LENGTH {
            return None;
        }
        let (signature, message) = signed.split_at(Self::SIGNATURE_LENGTH);
        Self::verify(public_key, message, signature).then_some(message)
    }
}

/// Ed25519 with NaCl-compatible key layout.
///
/// The private key is 64 bytes: the 32 byte seed followed by the public key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ed25519;

impl SignatureAlgorithm for Ed25519 {
    const NAME: &'static str = "ed25519";
    const SEED_LENGTH: usize = ed25519_dalek::SECRET_KEY_LENGTH;
    const PUBLIC_KEY_LENGTH: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;
    const PRIVATE_KEY_LENGTH: usize = ed25519_dalek::KEYPAIR_LENGTH;
    const SIGNATURE_LENGTH: usize = ed25519_dalek::SIGNATURE_LENGTH;

    type PublicKey = VerifyingKey;
    type PrivateKey = SigningKey;

    fn private_key_from_seed(seed: &[u8]) -> Result<SigningKey, XwtError> {
        let seed: &[u8; ed25519_dalek::SECRET_KEY_LENGTH] = seed.try_into().map_err(|_| {
            XwtError::InvalidPrivateKey(format!(
                "expected {} byte seed, got {}",
                Self::SEED_LENGTH,
                seed.len()
            ))
        })?;
        Ok(SigningKey::from_bytes(seed))
    }

    fn private_key_from_bytes(bytes: &[u8]) -> Result<SigningKey, XwtError> {
        let bytes: &[u8; ed25519_dalek::KEYPAIR_LENGTH] = bytes.try_into().map_err(|_| {
            XwtError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                Self::PRIVATE_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        // Rejects keys whose embedded public half does not match the seed.
        SigningKey::from_keypair_bytes(bytes)
            .map_err(|e| XwtError::InvalidPrivateKey(e.to_string()))
    }

    fn public_key_from_bytes(bytes: &[u8]) -> Result<VerifyingKey, XwtError> {
        let bytes: &[u8; ed25519_dalek::PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            XwtError::InvalidPublicKey(format!(
                "expected {} bytes, got {}",
                Self::PUBLIC_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        VerifyingKey::from_bytes(bytes).map_err(|e| XwtError::InvalidPublicKey(e.to_string()))
    }

    fn public_key(private_key: &SigningKey) -> VerifyingKey {
        private_key.verifying_key()
    }

    fn private_key_bytes(private_key: &SigningKey) -> Vec<u8> {
        private_key.to_keypair_bytes().to_vec()
    }

    fn public_key_bytes(public_key: &VerifyingKey) -> Vec<u8> {
        public_key.to_bytes().to_vec()
    }

    fn sign(private_key: &SigningKey, message: &[u8]) -> Vec<u8> {
        let signature: Signature = Signer::sign(private_key, message);
        signature.to_bytes().to_vec()
    }

    fn verify(public_key: &VerifyingKey, message: &[u8], signature: &[u8]) -> bool {
        match Signature::from_slice(signature) {
            Ok(signature) => Verifier::verify(public_key, message, &signature).is_ok(),
            Err(_) => false,
        }
    }
}
