//! Error types for the counting trie and the record driver.

use thiserror::Error;

/// Errors raised by [`CountingTrie`](crate::CountingTrie) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// A token contained a byte outside the trie's alphabet.
    #[error("symbol 0x{symbol:02x} at position {position} is outside the alphabet")]
    SymbolOutOfAlphabet {
        /// The rejected byte.
        symbol: u8,
        /// Offset of the byte within the token.
        position: usize,
    },

    /// Growing the node arena or a child list failed.
    #[error("failed to allocate trie node storage")]
    AllocationFailed,

    /// A token's count would exceed `u64::MAX`.
    #[error("occurrence count overflowed")]
    CountOverflow,
}

/// Errors raised while tallying records.
#[derive(Error, Debug)]
pub enum TallyError {
    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record had no delimiter, so no token boundary exists.
    #[error("line {line}: no delimiter found")]
    MissingDelimiter {
        /// 1-based line number of the record.
        line: u64,
    },

    /// The trie rejected the token extracted from a record.
    #[error("line {line}: invalid token")]
    InvalidToken {
        /// 1-based line number of the record.
        line: u64,
        /// Underlying trie error.
        #[source]
        source: TrieError,
    },

    /// A configured watched token cannot be queried.
    #[error("watched token {token:?} is invalid")]
    InvalidWatchedToken {
        /// The offending watched token.
        token: String,
        /// Underlying trie error.
        #[source]
        source: TrieError,
    },

    /// A configuration value was rejected.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result alias for driver operations.
pub type TallyResult<T> = Result<T, TallyError>;
