//! Settings that control how keys are built.
//!
//! Values can be supplied programmatically or read from the process
//! environment and `.env` files (via `dotenv-flow`):
//!
//! - `JWK_VALIDATION`: `strict` (default) or `lazy`
//! - `JWK_KID_LENGTH`: number of thumbprint characters used for generated key ids (default 7)

use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

const VALIDATION_VAR: &str = "JWK_VALIDATION";
const KID_LENGTH_VAR: &str = "JWK_KID_LENGTH";

/// Default length of a generated key id.
pub const DEFAULT_KID_LENGTH: usize = 7;

/// When the secret material of a key is checked.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Validation {
    /// `k` must be valid base64url when the key is built.
    #[default]
    Strict,
    /// `k` is only decoded when the binary key is requested.
    Lazy,
}

impl FromStr for Validation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Validation::Strict),
            "lazy" => Ok(Validation::Lazy),
            other => Err(Error::msg(
                ErrorKind::KeyFormat,
                format!("unknown validation mode `{other}`"),
            )),
        }
    }
}

/// Key construction settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyConfig {
    pub validation: Validation,
    pub kid_length: usize,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            validation: Validation::default(),
            kid_length: DEFAULT_KID_LENGTH,
        }
    }
}

impl KeyConfig {
    /// Reads the settings from the environment, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_read)
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = KeyConfig::default();

        if let Some(value) = lookup(VALIDATION_VAR) {
            config.validation = value.parse()?;
        }

        if let Some(value) = lookup(KID_LENGTH_VAR) {
            config.kid_length = value.trim().parse().map_err(|err| {
                Error::msg(
                    ErrorKind::KeyFormat,
                    format!("invalid {KID_LENGTH_VAR} `{value}`: {err}"),
                )
            })?;
        }

        Ok(config)
    }
}

// Process environment first, then the dotenv-flow files if any are present.
fn env_read(key: &str) -> Option<String> {
    if let Ok(value) = std::env::var(key) {
        return Some(value);
    }

    dotenv_flow::dotenv_iter().ok()?.find_map(|item| {
        let (k, v) = item.ok()?;
        (k == key).then_some(v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = KeyConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, KeyConfig::default());
        assert_eq!(config.validation, Validation::Strict);
        assert_eq!(config.kid_length, DEFAULT_KID_LENGTH);
    }

    #[test]
    fn test_reads_overrides() {
        let config = KeyConfig::from_lookup(lookup(&[
            ("JWK_VALIDATION", "Lazy"),
            ("JWK_KID_LENGTH", " 12 "),
        ]))
        .unwrap();
        assert_eq!(config.validation, Validation::Lazy);
        assert_eq!(config.kid_length, 12);
    }

    #[test]
    fn test_rejects_unknown_values() {
        let err = KeyConfig::from_lookup(lookup(&[("JWK_VALIDATION", "eager")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyFormat);

        let err = KeyConfig::from_lookup(lookup(&[("JWK_KID_LENGTH", "seven")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyFormat);
    }
}
