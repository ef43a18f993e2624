//! Driver configuration.
//!
//! ```toml
//! watched = ["Connection", "Accept", "Content-Length"]
//! delimiter = ":"
//! alphabet = "header-name"
//! on_malformed = "abort"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::alphabet::Alphabet;
use crate::error::{TallyError, TallyResult};

/// What to do with a record that has no delimiter or an unusable token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedPolicy {
    /// Log a warning and move on.
    #[default]
    Skip,
    /// Stop and return the error.
    Abort,
}

/// Configuration for a [`Tally`](crate::Tally) run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tokens to report, in output order.
    pub watched: Vec<String>,
    /// The token ends at the first occurrence of this character.
    pub delimiter: char,
    pub alphabet: Alphabet,
    pub on_malformed: MalformedPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watched: vec![
                "Connection".to_string(),
                "Accept".to_string(),
                "Content-Length".to_string(),
            ],
            delimiter: ':',
            alphabet: Alphabet::Ascii,
            on_malformed: MalformedPolicy::Skip,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> TallyResult<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> TallyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// The delimiter as a byte. Only ASCII delimiters are accepted, and not
    /// the line terminators, which are stripped before tokens are extracted.
    pub fn delimiter_byte(&self) -> TallyResult<u8> {
        let byte = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                TallyError::Config(format!(
                    "delimiter {:?} is not an ASCII character",
                    self.delimiter
                ))
            })?;
        if matches!(byte, b'\n' | b'\r') {
            return Err(TallyError::Config(format!(
                "delimiter {:?} is a line terminator",
                self.delimiter
            )));
        }
        Ok(byte)
    }

    /// Checks the delimiter and that every watched token fits the alphabet.
    pub fn validate(&self) -> TallyResult<()> {
        self.delimiter_byte()?;
        for token in &self.watched {
            self.alphabet
                .check(token.as_bytes())
                .map_err(|source| TallyError::InvalidWatchedToken {
                    token: token.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}
