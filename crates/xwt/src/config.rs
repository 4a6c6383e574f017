//! Issuer and verifier configuration.

use crate::error::XwtError;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for token issuing and verification.
///
/// Loaded from YAML, e.g.:
///
/// ```yaml
/// public_key_env: XWT_PUBLIC_KEY
/// private_key_file: keys/private.key
/// expiry_grace_period: 30s
/// default_lifetime: 24h
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XwtConfig {
    /// Environment variable containing the public key (hex-encoded).
    #[serde(default)]
    pub public_key_env: Option<String>,

    /// Path to the public key file.
    #[serde(default)]
    pub public_key_file: Option<PathBuf>,

    /// Environment variable containing the private key (hex-encoded).
    #[serde(default)]
    pub private_key_env: Option<String>,

    /// Path to the private key file.
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,

    /// Extra time a token stays valid after its expiry (e.g., "30s", "5m").
    #[serde(default = "default_grace_period")]
    pub expiry_grace_period: String,

    /// Lifetime of newly issued tokens (e.g., "24h", "7d").
    #[serde(default = "default_lifetime")]
    pub default_lifetime: String,
}

impl Default for XwtConfig {
    fn default() -> Self {
        Self {
            public_key_env: None,
            public_key_file: None,
            private_key_env: None,
            private_key_file: None,
            expiry_grace_period: default_grace_period(),
            default_lifetime: default_lifetime(),
        }
    }
}

fn default_grace_period() -> String {
    "0s".to_string()
}

fn default_lifetime() -> String {
    "24h".to_string()
}

impl XwtConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, XwtError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| XwtError::Config(format!("{}: {}", path.display(), e)))?;
        // Surface bad durations at load time rather than first use.
        config.grace_period()?;
        config.lifetime()?;
        Ok(config)
    }

    /// Parsed `expiry_grace_period`.
    pub fn grace_period(&self) -> Result<Duration, XwtError> {
        parse_duration(&self.expiry_grace_period)
    }

    /// Parsed `default_lifetime`.
    pub fn lifetime(&self) -> Result<Duration, XwtError> {
        parse_duration(&self.default_lifetime)
    }

    /// Resolve the public key from environment or file.
    pub fn resolve_public_key(&self) -> Result<Option<String>, XwtError> {
        resolve_key(self.public_key_env.as_deref(), self.public_key_file.as_deref())
    }

    /// Resolve the private key from environment or file.
    pub fn resolve_private_key(&self) -> Result<Option<String>, XwtError> {
        resolve_key(self.private_key_env.as_deref(), self.private_key_file.as_deref())
    }
}

fn resolve_key(env_var: Option<&str>, path: Option<&Path>) -> Result<Option<String>, XwtError> {
    // Try environment variable first
    if let Some(env_var) = env_var {
        if let Ok(key) = std::env::var(env_var) {
            return Ok(Some(key.trim().to_string()));
        }
    }

    // Try file path
    if let Some(path) = path {
        if path.exists() {
            let key = std::fs::read_to_string(path)?;
            return Ok(Some(key.trim().to_string()));
        }
    }

    Ok(None)
}

/// Parse a duration string like "24h", "7d", "30m" or "60s".
///
/// A bare number is read as hours.
pub fn parse_duration(s: &str) -> Result<Duration, XwtError> {
    let s = s.trim().to_lowercase();
    let (amount, unit) = match s.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&s[..i], c),
        _ => (s.as_str(), 'h'),
    };

    let amount: i64 = amount
        .trim()
        .parse()
        .map_err(|e| XwtError::Config(format!("invalid duration {:?}: {}", s, e)))?;

    let duration = match unit {
        'd' => Duration::try_days(amount),
        'h' => Duration::try_hours(amount),
        'm' => Duration::try_minutes(amount),
        's' => Duration::try_seconds(amount),
        other => {
            return Err(XwtError::Config(format!(
                "unknown duration unit {:?} in {:?}",
                other, s
            )));
        }
    };
    duration.ok_or_else(|| XwtError::Config(format!("duration {:?} is out of range", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("24h").unwrap(), Duration::hours(24));
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
        assert_eq!(parse_duration("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_duration("60s").unwrap(), Duration::seconds(60));
        assert_eq!(parse_duration(" 2H ").unwrap(), Duration::hours(2));
        assert_eq!(parse_duration("3").unwrap(), Duration::hours(3));
        assert_eq!(parse_duration("0s").unwrap(), Duration::zero());
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(matches!(parse_duration("soon"), Err(XwtError::Config(_))));
        assert!(matches!(parse_duration("h"), Err(XwtError::Config(_))));
        assert!(matches!(
            parse_duration("99999999999999999d"),
            Err(XwtError::Config(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let config = XwtConfig::default();
        assert_eq!(config.grace_period().unwrap(), Duration::zero());
        assert_eq!(config.lifetime().unwrap(), Duration::hours(24));
        assert!(config.resolve_public_key().unwrap().is_none());
    }

    #[test]
    fn test_load_yaml() {
        let mut key_file = NamedTempFile::new().unwrap();
        writeln!(key_file, "  abcdef  ").unwrap();

        let mut config_file = NamedTempFile::new().unwrap();
        writeln!(
            config_file,
            "public_key_file: {}\nexpiry_grace_period: 5m",
            key_file.path().display()
        )
        .unwrap();

        let config = XwtConfig::load(config_file.path()).unwrap();
        assert_eq!(config.grace_period().unwrap(), Duration::minutes(5));
        assert_eq!(config.lifetime().unwrap(), Duration::hours(24));
        assert_eq!(config.resolve_public_key().unwrap().as_deref(), Some("abcdef"));
    }

    #[test]
    fn test_load_rejects_bad_duration() {
        let mut config_file = NamedTempFile::new().unwrap();
        writeln!(config_file, "default_lifetime: forever").unwrap();
        assert!(matches!(
            XwtConfig::load(config_file.path()),
            Err(XwtError::Config(_))
        ));
    }

    #[test]
    fn test_env_takes_precedence_over_file() {
        let mut key_file = NamedTempFile::new().unwrap();
        writeln!(key_file, "from-file").unwrap();

        let var = "XWT_CONFIG_TEST_PRIVATE_KEY";
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var(var, "from-env") };

        let config = XwtConfig {
            private_key_env: Some(var.to_string()),
            private_key_file: Some(key_file.path().to_path_buf()),
            ..XwtConfig::default()
        };
        assert_eq!(config.resolve_private_key().unwrap().as_deref(), Some("from-env"));

        unsafe { std::env::remove_var(var) };
        assert_eq!(config.resolve_private_key().unwrap().as_deref(), Some("from-file"));
    }
}
