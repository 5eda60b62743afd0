// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The options that describe *where* and *how* to download (URL list,
// downloads directory, concurrency, timeouts) are global, so they can be
// given before or after the subcommand. The subcommand only picks the
// report format.
//
// Rust concepts:
// - Derive macros: clap generates the parser from these structs
// - #[arg(global = true)]: an option shared by every subcommand
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "file-stats",
    version = "0.1.0",
    about = "Download text files concurrently and report size, SHA-256 and word statistics",
    long_about = "file-stats downloads every URL listed in a text file, then reports each file's \
                  name, SHA-256 digest, size, word count, unique word count and today's date \
                  as JSON or as rows appended to a CSV file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Text file with one URL per line
    #[arg(long, global = true, default_value = "urls.txt")]
    pub urls: PathBuf,

    /// Directory the downloaded files are written to (created if missing)
    #[arg(long = "downloads-path", global = true, default_value = "downloads")]
    pub downloads_path: PathBuf,

    /// Maximum number of URLs processed at the same time
    #[arg(long, global = true, default_value_t = 16)]
    pub concurrency: usize,

    /// Timeout for a single download, in seconds
    #[arg(long = "timeout-secs", global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Timeout for establishing a connection, in seconds
    #[arg(long = "connect-timeout-secs", global = true, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Give up on every unfinished URL after this many seconds
    #[arg(long = "deadline-secs", global = true)]
    pub deadline_secs: Option<u64>,

    /// Show debug logs (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the statistics as a JSON array, one entry per URL
    ///
    /// Failed URLs appear in place as {"url": ..., "error": ...}
    Json {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Append the statistics to a CSV file and print the whole file
    ///
    /// Failed URLs are skipped. The header row is only written once.
    Csv {
        /// CSV file to append to
        #[arg(long, default_value = "interview.csv")]
        output: PathBuf,
    },

    /// Serve both reports over HTTP: GET /json and GET /csv
    ///
    /// Every request runs a fresh batch over the URL list.
    Serve {
        /// Port to listen on (all interfaces)
        #[arg(long, default_value_t = 5000)]
        port: u16,

        /// CSV file that GET /csv appends to
        #[arg(long, default_value = "interview.csv")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn to_config(&self) -> Config {
        Config {
            urls_file: self.urls.clone(),
            downloads_dir: self.downloads_path.clone(),
            concurrency: self.concurrency,
            request_timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            deadline: self.deadline_secs.map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["file-stats", "json"]);
        let config = cli.to_config();
        assert_eq!(config.urls_file, PathBuf::from("urls.txt"));
        assert_eq!(config.downloads_dir, PathBuf::from("downloads"));
        assert_eq!(config.concurrency, 16);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.deadline, None);
        assert!(matches!(cli.command, Commands::Json { pretty: false }));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "file-stats",
            "csv",
            "--output",
            "out.csv",
            "--downloads-path",
            "/tmp/dl",
            "--deadline-secs",
            "5",
        ]);
        let config = cli.to_config();
        assert_eq!(config.downloads_dir, PathBuf::from("/tmp/dl"));
        assert_eq!(config.deadline, Some(Duration::from_secs(5)));
        match cli.command {
            Commands::Csv { output } => assert_eq!(output, PathBuf::from("out.csv")),
            other => panic!("expected csv, got {other:?}"),
        }
    }

    #[test]
    fn test_serve_defaults_and_port() {
        let cli = Cli::parse_from(["file-stats", "serve"]);
        match cli.command {
            Commands::Serve { port, output } => {
                assert_eq!(port, 5000);
                assert_eq!(output, PathBuf::from("interview.csv"));
            }
            other => panic!("expected serve, got {other:?}"),
        }

        let cli = Cli::parse_from(["file-stats", "serve", "--port", "8080", "--concurrency", "4"]);
        assert_eq!(cli.to_config().concurrency, 4);
        assert!(matches!(cli.command, Commands::Serve { port: 8080, .. }));
    }
}
