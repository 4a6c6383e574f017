//! Token creation, serialization and verification.

use crate::algorithm::{Ed25519, SignatureAlgorithm};
use crate::codec::{self, HEADER_LENGTH, SUPPORTED_VERSION};
use crate::error::XwtError;
use crate::keys::KeyPair;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::marker::PhantomData;

/// The logical fields of a token.
///
/// Construction validates the version and the expiry range, so a `Token`
/// always has a canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    version: u8,
    expires: i64,
    id: Vec<u8>,
}

impl Token {
    /// Create a token, rejecting unsupported versions and expiries that do
    /// not fit the fixed-width field.
    pub fn new(version: u8, expires: i64, id: impl Into<Vec<u8>>) -> Result<Self, XwtError> {
        codec::check_version(version)?;
        codec::check_expires(expires)?;
        Ok(Self {
            version,
            expires,
            id: id.into(),
        })
    }

    /// Create a version 1 token.
    pub fn v1(expires: i64, id: impl Into<Vec<u8>>) -> Result<Self, XwtError> {
        Self::new(SUPPORTED_VERSION, expires, id)
    }

    pub(crate) fn from_decoded(version: u8, expires: i64, id: Vec<u8>) -> Self {
        Self {
            version,
            expires,
            id,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Expiry in Unix seconds.
    pub fn expires(&self) -> i64 {
        self.expires
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    /// Nominal expiry instant, without any grace period.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires, 0)
    }

    /// The canonical bytes that get signed.
    pub fn encode(&self) -> Result<Vec<u8>, XwtError> {
        codec::encode(self.version, self.expires, &self.id)
    }

    /// Sign the canonical encoding with `keypair`.
    pub fn sign<A: SignatureAlgorithm>(
        &self,
        keypair: &KeyPair<A>,
    ) -> Result<SignedToken<A>, XwtError> {
        let canonical = self.encode()?;
        let mut signature = A::sign_attached(keypair.private_key(), &canonical);
        signature.truncate(A::SIGNATURE_LENGTH);
        Ok(SignedToken {
            token: self.clone(),
            signature,
            canonical,
            algorithm: PhantomData,
        })
    }

    /// Attach a detached signature produced elsewhere.
    ///
    /// The signature is not checked here; call [`SignedToken::verify`].
    pub fn with_signature<A: SignatureAlgorithm>(
        self,
        signature: Vec<u8>,
    ) -> Result<SignedToken<A>, XwtError> {
        if signature.len() != A::SIGNATURE_LENGTH {
            return Err(XwtError::UnsignedToken);
        }
        let canonical = self.encode()?;
        Ok(SignedToken {
            token: self,
            signature,
            canonical,
            algorithm: PhantomData,
        })
    }
}

/// A token together with its signature and the exact bytes the signature
/// covers.
///
/// `canonical` is fixed at construction: from [`Token::sign`] it is the
/// bytes that were signed, from [`SignedToken::parse`] it is the bytes that
/// arrived. It is never re-encoded from the fields.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedToken<A: SignatureAlgorithm = Ed25519> {
    token: Token,
    signature: Vec<u8>,
    canonical: Vec<u8>,
    algorithm: PhantomData<fn() -> A>,
}

impl<A: SignatureAlgorithm> fmt::Debug for SignedToken<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedToken")
            .field("algorithm", &A::NAME)
            .field("version", &self.token.version)
            .field("expires", &self.token.expires)
            .field("id", &String::from_utf8_lossy(&self.token.id))
            .field("signature", &hex::encode(&self.signature))
            .finish()
    }
}

impl<A: SignatureAlgorithm> SignedToken<A> {
    /// Minimum length of a serialized token (empty id).
    pub const MIN_LENGTH: usize = A::SIGNATURE_LENGTH + HEADER_LENGTH;

    /// Parse a serialized token: `signature || version || expires || id`.
    pub fn parse(bytes: &[u8]) -> Result<Self, XwtError> {
        if bytes.len() < Self::MIN_LENGTH {
            return Err(XwtError::TruncatedToken {
                len: bytes.len(),
                min: Self::MIN_LENGTH,
            });
        }

        let (signature, canonical) = bytes.split_at(A::SIGNATURE_LENGTH);
        let token = codec::decode(canonical)?;

        tracing::debug!(
            expires = token.expires,
            id_len = token.id.len(),
            "Parsed token"
        );

        Ok(Self {
            token,
            signature: signature.to_vec(),
            canonical: canonical.to_vec(),
            algorithm: PhantomData,
        })
    }

    /// Encode as `signature || canonical`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.signature.len() + self.canonical.len());
        bytes.extend_from_slice(&self.signature);
        bytes.extend_from_slice(&self.canonical);
        bytes
    }

    /// Verify the signature against `public_key`, then check expiry against
    /// the current time plus `grace_period`.
    pub fn verify(
        &self,
        public_key: &A::PublicKey,
        grace_period: Duration,
    ) -> Result<(), XwtError> {
        self.verify_at(public_key, grace_period, Utc::now())
    }

    /// Like [`verify`](Self::verify) with an explicit clock.
    ///
    /// The token is valid up to and including `expires + grace_period`.
    pub fn verify_at(
        &self,
        public_key: &A::PublicKey,
        grace_period: Duration,
        now: DateTime<Utc>,
    ) -> Result<(), XwtError> {
        // Signature first: nothing about expiry is revealed for forged tokens.
        if A::open(public_key, &self.serialize()).is_none() {
            return Err(XwtError::InvalidSignature);
        }

        let expires_at = self.token.expires_at().ok_or_else(|| {
            XwtError::MalformedExpiry(format!("{} is out of range", self.token.expires))
        })?;
        let deadline = expires_at.checked_add_signed(grace_period).unwrap_or(
            if grace_period < Duration::zero() {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            },
        );

        if now > deadline {
            return Err(XwtError::ExpiredToken {
                expired_at: expires_at.to_rfc3339(),
            });
        }
        Ok(())
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn into_token(self) -> Token {
        self.token
    }

    pub fn version(&self) -> u8 {
        self.token.version
    }

    pub fn expires(&self) -> i64 {
        self.token.expires
    }

    pub fn id(&self) -> &[u8] {
        &self.token.id
    }

    /// The detached signature.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The bytes covered by the signature.
    pub fn canonical_bytes(&self) -> &[u8] {
        &self.canonical
    }
}

/// Issues signed tokens with a default lifetime.
pub struct TokenIssuer<A: SignatureAlgorithm = Ed25519> {
    keypair: KeyPair<A>,
    lifetime: Duration,
}

impl<A: SignatureAlgorithm> TokenIssuer<A> {
    /// Create a new token issuer with the given keypair and lifetime.
    pub fn new(keypair: KeyPair<A>, lifetime: Duration) -> Self {
        Self { keypair, lifetime }
    }

    pub fn public_key(&self) -> &A::PublicKey {
        self.keypair.public_key()
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a v1 token for `id` expiring `lifetime` from now.
    pub fn issue(&self, id: impl Into<Vec<u8>>) -> Result<SignedToken<A>, XwtError> {
        let expires = Utc::now()
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| {
                XwtError::MalformedExpiry(format!("lifetime {} overflows", self.lifetime))
            })?
            .timestamp();
        self.issue_until(id, expires)
    }

    /// Issue a v1 token for `id` expiring at `expires` (Unix seconds).
    pub fn issue_until(
        &self,
        id: impl Into<Vec<u8>>,
        expires: i64,
    ) -> Result<SignedToken<A>, XwtError> {
        let signed = Token::v1(expires, id)?.sign(&self.keypair)?;
        tracing::debug!(
            algorithm = A::NAME,
            expires = signed.expires(),
            id_len = signed.id().len(),
            "Issued token"
        );
        Ok(signed)
    }
}

/// Verifier for serialized tokens.
pub struct TokenVerifier<A: SignatureAlgorithm = Ed25519> {
    public_key: A::PublicKey,
    grace_period: Duration,
}

impl<A: SignatureAlgorithm> TokenVerifier<A> {
    /// Create a new token verifier with the given public key.
    pub fn new(public_key: A::PublicKey, grace_period: Duration) -> Self {
        Self {
            public_key,
            grace_period,
        }
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Parse and verify a serialized token.
    pub fn verify(&self, bytes: &[u8]) -> Result<SignedToken<A>, XwtError> {
        self.verify_at(bytes, Utc::now())
    }

    /// Parse and verify a serialized token against an explicit clock.
    pub fn verify_at(
        &self,
        bytes: &[u8],
        now: DateTime<Utc>,
    ) -> Result<SignedToken<A>, XwtError> {
        let token = SignedToken::<A>::parse(bytes).inspect_err(|e| {
            tracing::warn!(error = %e, "Token parse failed");
        })?;
        token
            .verify_at(&self.public_key, self.grace_period, now)
            .inspect_err(|e| {
                tracing::warn!(error = %e, "Token verification failed");
            })?;
        tracing::debug!(expires = token.expires(), "Token verified");
        Ok(token)
    }
}
