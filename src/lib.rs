//! # header-tally
//!
//! Counts how often each leading token (the text before the first delimiter
//! on a line) appears in a log-like stream, using a counting trie.
//!
//! ## Example
//!
//! ```rust
//! use std::io::Cursor;
//! use header_tally::{Config, Tally};
//!
//! let input = "Accept: */*\nConnection: close\nAccept: text/html\n";
//! let mut tally = Tally::new(Config::default()).unwrap();
//! tally.feed_reader(Cursor::new(input)).unwrap();
//!
//! let report = tally.report().unwrap();
//! assert_eq!(report.get("Accept"), Some(2));
//! assert_eq!(report.get("Content-Length"), Some(0));
//! ```

#![deny(unsafe_code)]

pub mod alphabet;
pub mod config;
pub mod error;
pub mod tally;
pub mod trie;

pub use alphabet::Alphabet;
pub use config::{Config, MalformedPolicy};
pub use error::{TallyError, TallyResult, TrieError};
pub use tally::{extract_token, tally_file, Report, Tally, TallyStats};
pub use trie::CountingTrie;

#[cfg(test)]
mod proptests;
