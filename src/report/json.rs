// src/report/json.rs
// =============================================================================
// JSON report: one array entry per URL, in the order of the URL list.
//
// A successful entry is the FileRecord itself:
//   {"File name": "downloaded_file_0.txt", "Sha256 hexdigest": "...", ...}
//
// A failed entry keeps its position and says what went wrong:
//   {"url": "http://example.com/missing.txt", "error": "network error ..."}
//
// One failed download never turns the whole report into an error.
// =============================================================================

use serde::Serialize;

use super::run_batch;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::stats::FileRecord;

/// The result for a single URL, as it appears in the JSON array.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Record(FileRecord),
    Failure { url: String, error: String },
}

impl Outcome {
    pub fn from_result(url: String, result: Result<FileRecord>) -> Self {
        match result {
            Ok(record) => Outcome::Record(record),
            Err(e) => Outcome::Failure {
                url,
                error: e.chain_message(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Record(_))
    }
}

/// Runs the batch described by `config` and returns one Outcome per URL.
pub async fn records(config: &Config) -> Result<Vec<Outcome>> {
    let (urls, results) = run_batch(config).await?;
    Ok(urls
        .into_iter()
        .zip(results)
        .map(|(url, result)| Outcome::from_result(url, result))
        .collect())
}

pub fn to_json(outcomes: &[Outcome], pretty: bool) -> Result<String> {
    let encoded = if pretty {
        serde_json::to_string_pretty(outcomes)
    } else {
        serde_json::to_string(outcomes)
    };
    encoded.map_err(|e| Error::Encode(e.to_string()))
}
