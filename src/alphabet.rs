//! Symbol alphabets accepted by the trie.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::TrieError;

/// The set of bytes a [`CountingTrie`](crate::CountingTrie) accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alphabet {
    /// Every one-byte value below 0x80.
    #[default]
    Ascii,
    /// `A-Z`, `a-z`, `0-9` and `-`.
    HeaderName,
}

impl Alphabet {
    #[inline]
    pub fn contains(self, symbol: u8) -> bool {
        match self {
            Alphabet::Ascii => symbol.is_ascii(),
            Alphabet::HeaderName => symbol.is_ascii_alphanumeric() || symbol == b'-',
        }
    }

    /// Rejects the first byte of `token` that is not in the alphabet.
    pub fn check(self, token: &[u8]) -> Result<(), TrieError> {
        match token.iter().position(|&b| !self.contains(b)) {
            Some(position) => Err(TrieError::SymbolOutOfAlphabet {
                symbol: token[position],
                position,
            }),
            None => Ok(()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Alphabet::Ascii => "ascii",
            Alphabet::HeaderName => "header-name",
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Alphabet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascii" => Ok(Alphabet::Ascii),
            "header-name" => Ok(Alphabet::HeaderName),
            other => Err(format!(
                "unknown alphabet {other:?} (expected \"ascii\" or \"header-name\")"
            )),
        }
    }
}
