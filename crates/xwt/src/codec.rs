//! Canonical encoding of a token's signed fields.
//!
//! | Field   | Offset | Width     | Encoding                                |
//! |---------|--------|-----------|-----------------------------------------|
//! | version | 0      | 2         | ASCII `"v1"`                            |
//! | expires | 2      | 10        | ASCII decimal, zero-left-padded         |
//! | id      | 12     | remaining | verbatim, length implied by buffer size |
//!
//! There are no length prefixes. The id runs to the end of the buffer.

use crate::error::XwtError;
use crate::token::Token;

/// Width of the version field.
pub const VERSION_LENGTH: usize = 2;

/// Width of the expires field.
pub const EXPIRES_LENGTH: usize = 10;

/// Width of the fixed header preceding the id.
pub const HEADER_LENGTH: usize = VERSION_LENGTH + EXPIRES_LENGTH;

/// The only version this crate produces or accepts.
pub const SUPPORTED_VERSION: u8 = 1;

/// Largest expiry that fits in the expires field.
pub const MAX_EXPIRES: i64 = 9_999_999_999;

const VERSION_TAG: &[u8; VERSION_LENGTH] = b"v1";

/// Encode `{version, expires, id}` into its canonical bytes.
pub fn encode(version: u8, expires: i64, id: &[u8]) -> Result<Vec<u8>, XwtError> {
    check_version(version)?;
    check_expires(expires)?;

    let mut bytes = Vec::with_capacity(HEADER_LENGTH + id.len());
    bytes.extend_from_slice(VERSION_TAG);
    bytes.extend_from_slice(format!("{:0width$}", expires, width = EXPIRES_LENGTH).as_bytes());
    bytes.extend_from_slice(id);
    Ok(bytes)
}

/// Decode canonical bytes back into a [`Token`].
pub fn decode(bytes: &[u8]) -> Result<Token, XwtError> {
    if bytes.len() < HEADER_LENGTH {
        return Err(XwtError::TruncatedToken {
            len: bytes.len(),
            min: HEADER_LENGTH,
        });
    }

    let (version, rest) = bytes.split_at(VERSION_LENGTH);
    let (expires, id) = rest.split_at(EXPIRES_LENGTH);

    if version != VERSION_TAG {
        return Err(XwtError::InvalidVersion(
            String::from_utf8_lossy(version).into_owned(),
        ));
    }

    let expires = parse_expires(expires)?;
    Ok(Token::from_decoded(SUPPORTED_VERSION, expires, id.to_vec()))
}

pub(crate) fn check_version(version: u8) -> Result<(), XwtError> {
    if version != SUPPORTED_VERSION {
        return Err(XwtError::InvalidVersion(format!("v{}", version)));
    }
    Ok(())
}

pub(crate) fn check_expires(expires: i64) -> Result<(), XwtError> {
    if !(0..=MAX_EXPIRES).contains(&expires) {
        return Err(XwtError::MalformedExpiry(format!(
            "{} does not fit in {} decimal digits",
            expires, EXPIRES_LENGTH
        )));
    }
    Ok(())
}

fn parse_expires(field: &[u8]) -> Result<i64, XwtError> {
    if !field.iter().all(u8::is_ascii_digit) {
        return Err(XwtError::MalformedExpiry(format!(
            "{:?} is not a decimal number",
            String::from_utf8_lossy(field)
        )));
    }
    // At most 10 digits, cannot overflow i64.
    Ok(field
        .iter()
        .fold(0i64, |acc, digit| acc * 10 + i64::from(digit - b'0')))
}
