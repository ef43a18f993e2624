//! Command-line entry point: tally leading tokens of an input file.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use header_tally::{tally_file, Alphabet, Config, MalformedPolicy, Report};

/// Count how often watched header names lead the lines of a file.
#[derive(Parser, Debug)]
#[command(name = "header-tally", version, about)]
struct Args {
    /// Input file, one record per line
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Token to report; repeat to watch several (replaces the configured list)
    #[arg(short, long = "watch", value_name = "TOKEN")]
    watch: Vec<String>,

    /// Character that ends the token on each line
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Accepted token symbols: "ascii" or "header-name"
    #[arg(short, long)]
    alphabet: Option<Alphabet>,

    /// Fail on the first malformed record instead of skipping it
    #[arg(long)]
    strict: bool,
}

impl Args {
    fn into_config(self) -> Result<(PathBuf, Config)> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => Config::default(),
        };
        if !self.watch.is_empty() {
            config.watched = self.watch;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(alphabet) = self.alphabet {
            config.alphabet = alphabet;
        }
        if self.strict {
            config.on_malformed = MalformedPolicy::Abort;
        }
        Ok((self.input, config))
    }
}

fn init_logging() {
    let env = env_logger::Env::new()
        .filter_or("HEADER_TALLY_LOG", "warn")
        .write_style("HEADER_TALLY_LOG_STYLE");
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

fn write_report(out: &mut impl Write, report: &Report) -> io::Result<()> {
    write!(out, "{report}")?;
    out.flush()
}

fn main() -> Result<()> {
    init_logging();

    let (input, config) = Args::parse().into_config()?;
    log::debug!("configuration: {:?}", config);

    let report = tally_file(&input, config)
        .with_context(|| format!("tallying {}", input.display()))?;
    write_report(&mut io::stdout().lock(), &report).context("writing report to stdout")?;
    log::info!(
        "{} records, {} counted, {} skipped",
        report.stats.records,
        report.stats.counted,
        report.stats.skipped
    );
    Ok(())
}
