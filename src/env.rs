//! Environment variable lookup that tests can substitute.
//!
//! [`Env::real()`] reads the process environment; [`Env::mock()`] reads a
//! fixed map so config tests never touch `std::env::set_var`.

use std::collections::HashMap;
use std::str::FromStr;

/// Source of environment variables for config resolution.
#[derive(Clone, Debug, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

/// Outcome of reading and parsing a single variable.
#[derive(Debug, PartialEq, Eq)]
pub enum Parsed<T> {
    /// The variable is not set (or is blank).
    Missing,
    /// The variable parsed successfully.
    Value(T),
    /// The variable is set but could not be parsed; carries the raw text.
    Invalid(String),
}

impl Env {
    /// Read from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Read from the given key-value pairs only.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up a variable. Blank values count as unset.
    pub fn var(&self, name: &str) -> Option<String> {
        let value = match &self.overrides {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        }?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Look up a variable and parse it with [`FromStr`].
    pub fn parsed<T: FromStr>(&self, name: &str) -> Parsed<T> {
        match self.var(name) {
            None => Parsed::Missing,
            Some(raw) => match raw.parse() {
                Ok(v) => Parsed::Value(v),
                Err(_) => Parsed::Invalid(raw),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_env_reads_cargo_manifest_dir() {
        let env = Env::real();
        assert!(env.var("CARGO_MANIFEST_DIR").is_some());
    }

    #[test]
    fn mock_env_returns_trimmed_values() {
        let env = Env::mock([("BASE", "  http://localhost:3000 ")]);
        assert_eq!(env.var("BASE").as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn blank_value_is_missing() {
        let env = Env::mock([("BLANK", "   ")]);
        assert_eq!(env.var("BLANK"), None);
        assert_eq!(env.parsed::<u64>("BLANK"), Parsed::Missing);
    }

    #[test]
    fn parsed_distinguishes_invalid_from_missing() {
        let env = Env::mock([("TIMEOUT", "30"), ("BAD", "soon")]);
        assert_eq!(env.parsed::<u64>("TIMEOUT"), Parsed::Value(30));
        assert_eq!(env.parsed::<u64>("BAD"), Parsed::Invalid("soon".to_string()));
        assert_eq!(env.parsed::<u64>("ABSENT"), Parsed::Missing);
    }
}
