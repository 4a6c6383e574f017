//! Property tests for the token codec and signature checks.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use xwt::codec::{HEADER_LENGTH, MAX_EXPIRES};
use xwt::{Ed25519, KeyPair, SignedToken, Token, XwtError};

fn keypair() -> KeyPair {
    KeyPair::from_seed(b"thisistheroundtriptestsecretkey!").unwrap()
}

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

proptest! {
    /// Property: parse(serialize(sign(token))) preserves every field and verifies.
    #[test]
    fn prop_roundtrip(
        expires in 0..=MAX_EXPIRES,
        id in prop::collection::vec(any::<u8>(), 0..64),
        grace in 0i64..100_000,
    ) {
        let keypair = keypair();
        let signed = Token::v1(expires, id.clone()).unwrap().sign(&keypair).unwrap();
        let parsed = SignedToken::<Ed25519>::parse(&signed.serialize()).unwrap();

        prop_assert_eq!(parsed.version(), 1);
        prop_assert_eq!(parsed.expires(), expires);
        prop_assert_eq!(parsed.id(), id.as_slice());
        prop_assert_eq!(parsed.signature(), signed.signature());
        prop_assert!(
            parsed
                .verify_at(keypair.public_key(), Duration::seconds(grace), at(expires + grace))
                .is_ok()
        );
    }

    /// Property: flipping any single bit is rejected.
    ///
    /// Flips in the header may also surface as a parse error, which is just
    /// as much a rejection.
    #[test]
    fn prop_single_bit_flip_rejected(
        id in prop::collection::vec(any::<u8>(), 0..16),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let keypair = keypair();
        let mut bytes = Token::v1(1_700_000_000, id)
            .unwrap()
            .sign(&keypair)
            .unwrap()
            .serialize();
        let index = position.index(bytes.len());
        bytes[index] ^= 1 << bit;

        match SignedToken::<Ed25519>::parse(&bytes) {
            Ok(token) => {
                let result = token.verify_at(keypair.public_key(), Duration::zero(), at(0));
                prop_assert!(matches!(result, Err(XwtError::InvalidSignature)));
            }
            Err(e) => {
                prop_assert!(index >= 64 && index < 64 + HEADER_LENGTH);
                prop_assert!(matches!(
                    e,
                    XwtError::InvalidVersion(_) | XwtError::MalformedExpiry(_)
                ));
            }
        }
    }

    /// Property: anything shorter than the fixed header is truncated, never a panic.
    #[test]
    fn prop_short_input_truncated(bytes in prop::collection::vec(any::<u8>(), 0..76)) {
        prop_assert!(
            matches!(
                SignedToken::<Ed25519>::parse(&bytes),
                Err(XwtError::TruncatedToken { .. })
            ),
            "expected truncation error"
        );
    }

    /// Property: arbitrary input never panics the parser.
    #[test]
    fn prop_parse_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..160)) {
        let _ = SignedToken::<Ed25519>::parse(&bytes);
    }
}

#[test]
fn test_bit_flip_in_signature_region() {
    let keypair = keypair();
    let serialized = Token::v1(1_700_000_000, "user:1")
        .unwrap()
        .sign(&keypair)
        .unwrap()
        .serialize();

    for index in 0..64 {
        let mut bytes = serialized.clone();
        bytes[index] ^= 0x01;
        let token = SignedToken::<Ed25519>::parse(&bytes).unwrap();
        assert!(matches!(
            token.verify_at(keypair.public_key(), Duration::zero(), at(0)),
            Err(XwtError::InvalidSignature)
        ));
    }
}
