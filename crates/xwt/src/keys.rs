//! Keypair management for token signing.

use crate::algorithm::{Ed25519, SignatureAlgorithm};
use crate::error::XwtError;
use rand::TryRngCore;
use rand::rngs::OsRng;
use std::fmt;
use std::io::Read;

/// A public/private keypair for signing and verifying tokens.
///
/// Both halves are derived together from one seed and are never mutated
/// afterwards.
pub struct KeyPair<A: SignatureAlgorithm = Ed25519> {
    private_key: A::PrivateKey,
    public_key: A::PublicKey,
}

impl<A: SignatureAlgorithm> Clone for KeyPair<A> {
    fn clone(&self) -> Self {
        Self {
            private_key: self.private_key.clone(),
            public_key: self.public_key.clone(),
        }
    }
}

impl<A: SignatureAlgorithm> fmt::Debug for KeyPair<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &A::NAME)
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

impl<A: SignatureAlgorithm> KeyPair<A> {
    /// Generate a new random keypair from the operating system's CSPRNG.
    pub fn generate() -> Result<Self, XwtError> {
        let mut seed = vec![0u8; A::SEED_LENGTH];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| XwtError::KeyGenerationFailed(e.to_string()))?;
        Self::from_seed(&seed)
    }

    /// Generate a keypair from the first `SEED_LENGTH` bytes of `reader`.
    ///
    /// The result is fully determined by the bytes read. Only use a fixed
    /// source for reproducible test keys.
    pub fn generate_from_reader<R: Read>(mut reader: R) -> Result<Self, XwtError> {
        let mut seed = vec![0u8; A::SEED_LENGTH];
        reader
            .read_exact(&mut seed)
            .map_err(|e| XwtError::KeyGenerationFailed(e.to_string()))?;
        Self::from_seed(&seed)
    }

    /// Derive a keypair from raw seed bytes.
    pub fn from_seed(seed: &[u8]) -> Result<Self, XwtError> {
        let private_key = A::private_key_from_seed(seed)?;
        Ok(Self::from_private_key(private_key))
    }

    /// Create a keypair from an existing private key.
    pub fn from_private_key(private_key: A::PrivateKey) -> Self {
        let public_key = A::public_key(&private_key);
        Self {
            private_key,
            public_key,
        }
    }

    /// Load a keypair from private key bytes.
    pub fn from_private_key_bytes(bytes: &[u8]) -> Result<Self, XwtError> {
        Ok(Self::from_private_key(A::private_key_from_bytes(bytes)?))
    }

    /// Load a keypair from a hex-encoded private key string.
    pub fn from_private_key_hex(encoded: &str) -> Result<Self, XwtError> {
        let bytes =
            hex::decode(encoded.trim()).map_err(|e| XwtError::InvalidPrivateKey(e.to_string()))?;
        Self::from_private_key_bytes(&bytes)
    }

    /// Get the private key.
    pub fn private_key(&self) -> &A::PrivateKey {
        &self.private_key
    }

    /// Get the public key.
    pub fn public_key(&self) -> &A::PublicKey {
        &self.public_key
    }

    pub fn private_key_bytes(&self) -> Vec<u8> {
        A::private_key_bytes(&self.private_key)
    }

    pub fn public_key_bytes(&self) -> Vec<u8> {
        A::public_key_bytes(&self.public_key)
    }

    /// Get the private key as hex string.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key_bytes())
    }

    /// Get the public key as hex string.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }
}

/// Load a public key from hex string (for verification-only scenarios).
pub fn load_public_key_hex<A: SignatureAlgorithm>(encoded: &str) -> Result<A::PublicKey, XwtError> {
    let bytes =
        hex::decode(encoded.trim()).map_err(|e| XwtError::InvalidPublicKey(e.to_string()))?;
    A::public_key_from_bytes(&bytes)
}

/// Hex display form of a bare public key.
pub fn public_key_hex<A: SignatureAlgorithm>(public_key: &A::PublicKey) -> String {
    hex::encode(A::public_key_bytes(public_key))
}
