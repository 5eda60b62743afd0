// src/download/fetch.rs
// =============================================================================
// This module downloads a single URL to a file.
//
// Key functionality:
// - One GET request per URL, no retries
// - Any non-2xx status is treated as a failure
// - The full body is written to the destination, replacing any old file
//
// Timeouts:
// - connect: 10 seconds by default (--connect-timeout-secs)
// - whole request: 30 seconds by default (--timeout-secs)
// =============================================================================

use std::path::Path;

use reqwest::Client;

use crate::config::Config;
use crate::error::{Error, Result};

// Wraps a reqwest Client configured from Config
//
// Client is cheap to clone (it's reference counted internally), so every
// pipeline task gets its own clone and they all share one connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    // Downloads `url` and writes the body to `dest`
    //
    // Errors:
    //   Network - connection failed or the server returned a non-2xx status
    //   Timeout - the request took longer than the configured timeout
    //   Io      - the body could not be written to `dest`
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::from_reqwest(url, e))?;

        tokio::fs::write(dest, &body)
            .await
            .map_err(|e| Error::io(dest, e))?;

        tracing::trace!(url, bytes = body.len(), dest = %dest.display(), "wrote download");
        Ok(())
    }
}
