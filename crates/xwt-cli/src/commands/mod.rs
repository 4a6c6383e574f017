//! CLI command implementations for xwt.

pub mod keys;
pub mod token;
