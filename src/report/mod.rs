// src/report/mod.rs
// =============================================================================
// This module is the boundary between the pipeline and the outside world.
//
// Submodules:
// - json: every URL becomes either a record or a {url, error} object
// - csv: successful records are appended to a CSV store on disk
//
// Both reports start the same way: read the URL list, make sure the
// downloads directory exists, run the pipeline. That shared part lives here.
// =============================================================================

mod csv;
mod json;

pub use csv::{csv_results, read_csv, CsvStore};
pub use json::{records, to_json, Outcome};

use crate::config::Config;
use crate::download::Pipeline;
use crate::error::Result;
use crate::sources::read_url_list;
use crate::stats::FileRecord;

// Reads the URL list and runs the whole batch
//
// Returns the URLs alongside their results so callers can pair them up.
// Only URL-list and config problems fail here; per-URL errors are inside
// the returned vector.
async fn run_batch(config: &Config) -> Result<(Vec<String>, Vec<Result<FileRecord>>)> {
    let urls = read_url_list(&config.urls_file)?;
    let pipeline = Pipeline::new(config)?;
    config.ensure_downloads_dir()?;

    let results = pipeline.run(&urls, &config.downloads_dir).await;
    Ok((urls, results))
}
