// src/config.rs
// =============================================================================
// Runtime configuration for a single invocation.
//
// The Config struct is built once in main.rs from the parsed command line
// and then passed by reference into the pipeline and the report layer.
// Nothing in the crate reads configuration from a global.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default number of URLs processed at the same time.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Default whole-request timeout for a single download.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time allowed to establish a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    /// Line-delimited file listing the URLs to process
    pub urls_file: PathBuf,
    /// Where `downloaded_file_{index}.txt` files are written
    pub downloads_dir: PathBuf,
    /// Maximum number of fetch+analyze tasks in flight
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Optional deadline for the whole batch, measured from its start
    pub deadline: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urls_file: PathBuf::from("urls.txt"),
            downloads_dir: PathBuf::from("downloads"),
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            deadline: None,
        }
    }
}

impl Config {
    /// Rejects values that would stall or break the pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        if self.request_timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err(Error::Config("timeouts must be greater than zero".to_string()));
        }
        if matches!(self.deadline, Some(d) if d.is_zero()) {
            return Err(Error::Config("deadline must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Creates the downloads directory if it does not exist yet.
    pub fn ensure_downloads_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.downloads_dir)
            .map_err(|e| Error::io(&self.downloads_dir, e))
    }
}
