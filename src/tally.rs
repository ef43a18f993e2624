//! Feeds records into a [`CountingTrie`] and reports watched token counts.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::{Config, MalformedPolicy};
use crate::error::{TallyError, TallyResult};
use crate::trie::CountingTrie;

/// Returns the bytes of `record` before the first `delimiter`.
///
/// `None` means the record has no delimiter and therefore no token.
#[inline]
pub fn extract_token(record: &[u8], delimiter: u8) -> Option<&[u8]> {
    record
        .iter()
        .position(|&b| b == delimiter)
        .map(|end| &record[..end])
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallyStats {
    /// Records seen.
    pub records: u64,
    /// Records whose token was counted.
    pub counted: u64,
    /// Records dropped under [`MalformedPolicy::Skip`].
    pub skipped: u64,
}

/// Counts for the watched tokens, in configured order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub counts: Vec<(String, u64)>,
    pub stats: TallyStats,
}

impl Report {
    pub fn get(&self, token: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|(t, _)| t == token)
            .map(|&(_, n)| n)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (token, count) in &self.counts {
            writeln!(f, "'{token}' seen {count} times.")?;
        }
        Ok(())
    }
}

pub struct Tally {
    config: Config,
    delimiter: u8,
    trie: CountingTrie,
    stats: TallyStats,
}

impl Tally {
    pub fn new(config: Config) -> TallyResult<Self> {
        config.validate()?;
        let delimiter = config.delimiter_byte()?;
        let trie = CountingTrie::with_alphabet(config.alphabet);
        Ok(Self {
            config,
            delimiter,
            trie,
            stats: TallyStats::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn trie(&self) -> &CountingTrie {
        &self.trie
    }

    pub fn stats(&self) -> TallyStats {
        self.stats
    }

    /// Counts the token of one record. `line` is 1-based and used in errors.
    pub fn feed_record(&mut self, line: u64, record: &[u8]) -> TallyResult<()> {
        self.stats.records += 1;

        let Some(token) = extract_token(record, self.delimiter) else {
            return self.malformed(TallyError::MissingDelimiter { line });
        };

        match self.trie.insert(token) {
            Ok(_) => {
                self.stats.counted += 1;
                Ok(())
            }
            Err(source) => self.malformed(TallyError::InvalidToken { line, source }),
        }
    }

    /// Reads `\n`-separated records until EOF. A trailing `\r` is dropped.
    pub fn feed_reader<R: BufRead>(&mut self, mut reader: R) -> TallyResult<()> {
        let mut buf = Vec::new();
        let mut line = 0u64;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line += 1;

            let mut record = buf.as_slice();
            if let Some(rest) = record.strip_suffix(b"\n") {
                record = rest;
            }
            if let Some(rest) = record.strip_suffix(b"\r") {
                record = rest;
            }
            self.feed_record(line, record)?;
        }

        log::debug!(
            "read {} records: {} counted, {} skipped, {} distinct tokens in {} nodes",
            self.stats.records,
            self.stats.counted,
            self.stats.skipped,
            self.trie.len(),
            self.trie.node_count()
        );
        Ok(())
    }

    pub fn report(&self) -> TallyResult<Report> {
        let counts = self
            .config
            .watched
            .iter()
            .map(|token| {
                self.trie
                    .query(token)
                    .map(|n| (token.clone(), n))
                    .map_err(|source| TallyError::InvalidWatchedToken {
                        token: token.clone(),
                        source,
                    })
            })
            .collect::<TallyResult<Vec<_>>>()?;
        Ok(Report {
            counts,
            stats: self.stats,
        })
    }

    fn malformed(&mut self, err: TallyError) -> TallyResult<()> {
        match self.config.on_malformed {
            MalformedPolicy::Abort => Err(err),
            MalformedPolicy::Skip => {
                log::warn!("skipping record: {err}");
                self.stats.skipped += 1;
                Ok(())
            }
        }
    }
}

/// Tallies every record of the file at `path`.
pub fn tally_file(path: impl AsRef<Path>, config: Config) -> TallyResult<Report> {
    let path = path.as_ref();
    let file = File::open(path)?;
    log::info!("tallying {}", path.display());
    let mut tally = Tally::new(config)?;
    tally.feed_reader(BufReader::new(file))?;
    tally.report()
}
