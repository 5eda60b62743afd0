// src/download/pipeline.rs
// =============================================================================
// This module runs fetch + analyze over a whole list of URLs.
//
// How it works:
// 1. URL number i is downloaded to `<dest_dir>/downloaded_file_{i}.txt`
// 2. Up to `concurrency` URLs are processed at the same time
// 3. Each URL runs in its own tokio task: fetch, then analyze
// 4. Results come back in completion order, tagged with their index, and
//    are dropped into a slot vector so result[i] always matches urls[i]
//
// Failure isolation:
// - A failed download only fills its own slot with an error
// - A panicking task becomes Error::Task instead of crashing the batch
// - If a deadline is configured, anything unfinished at that point becomes
//   Error::Timeout while finished results are kept
//
// Task states: Pending -> Fetching -> Analyzing -> Done | Failed
//
// Rust concepts:
// - buffer_unordered: run up to N futures at once
// - tokio::spawn / spawn_blocking: async tasks vs. blocking file work
// - JoinHandle: awaiting a spawned task tells us if it panicked
// =============================================================================

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::task::JoinError;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::fetch::Fetcher;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::stats::{analyze, FileRecord};

/// Where the download for URL number `index` is written.
pub fn destination_path(dest_dir: &Path, index: usize) -> PathBuf {
    dest_dir.join(format!("downloaded_file_{}.txt", index))
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    fetcher: Fetcher,
    concurrency: usize,
    deadline: Option<Duration>,
}

impl Pipeline {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            concurrency: config.concurrency,
            deadline: config.deadline,
        })
    }

    // Processes every URL and returns one result per URL, in input order
    //
    // This never fails as a whole: every error is attached to the slot of
    // the URL that caused it.
    pub async fn run(&self, urls: &[String], dest_dir: &Path) -> Vec<Result<FileRecord>> {
        let fetcher = &self.fetcher;
        self.run_with(urls, dest_dir, |index, url, dest| {
            fetch_and_analyze(fetcher.clone(), url, dest, index)
        })
        .await
    }

    // Same as run(), with the per-URL work supplied by the caller
    //
    // `work(index, url, dest)` builds the future for one URL. Ordering,
    // the concurrency cap, the deadline and panic isolation all apply to it.
    async fn run_with<W, Fut>(
        &self,
        urls: &[String],
        dest_dir: &Path,
        work: W,
    ) -> Vec<Result<FileRecord>>
    where
        W: Fn(usize, String, PathBuf) -> Fut,
        Fut: Future<Output = Result<FileRecord>> + Send + 'static,
    {
        if urls.is_empty() {
            debug!("empty URL list, nothing to fetch");
            return Vec::new();
        }

        let started = Instant::now();
        let deadline = self.deadline.map(|d| started + d);
        info!(
            urls = urls.len(),
            concurrency = self.concurrency,
            dest = %dest_dir.display(),
            "starting batch"
        );

        let work = &work;
        let tasks = urls.iter().cloned().enumerate().map(|(index, url)| {
            let url = url.clone();
            let job = work(index, url.clone(), destination_path(dest_dir, index));
            async move {
                debug!(index, %url, "pending");
                let result = run_task(job, url, deadline).await;
                (index, result)
            }
        });

        let mut slots: Vec<Option<Result<FileRecord>>> = urls.iter().map(|_| None).collect();
        let mut completed = stream::iter(tasks).buffer_unordered(self.concurrency);

        while let Some((index, result)) = completed.next().await {
            match &result {
                Ok(_) => debug!(index, url = %urls[index], "done"),
                Err(e) => warn!(index, url = %urls[index], network = e.is_network(), error = %e.chain_message(), "failed"),
            }
            slots[index] = Some(result);
        }

        let results: Vec<Result<FileRecord>> = slots
            .into_iter()
            .zip(urls)
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| {
                    Err(Error::Task {
                        url: url.clone(),
                        message: "task never reported a result".to_string(),
                    })
                })
            })
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(
            ok = results.len() - failed,
            failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );

        results
    }
}

// Runs one URL in its own tokio task, bounded by the global deadline
async fn run_task<Fut>(job: Fut, url: String, deadline: Option<Instant>) -> Result<FileRecord>
where
    Fut: Future<Output = Result<FileRecord>> + Send + 'static,
{
    let mut handle = tokio::spawn(job);

    let joined = match deadline {
        Some(at) => match tokio::time::timeout_at(at, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                return Err(Error::Timeout { url });
            }
        },
        None => handle.await,
    };

    joined.unwrap_or_else(|e| Err(join_error(&url, e)))
}

async fn fetch_and_analyze(
    fetcher: Fetcher,
    url: String,
    dest: PathBuf,
    index: usize,
) -> Result<FileRecord> {
    debug!(index, %url, "fetching");
    fetcher.fetch(&url, &dest).await?;

    debug!(index, %url, "analyzing");
    tokio::task::spawn_blocking(move || analyze(&dest))
        .await
        .unwrap_or_else(|e| Err(join_error(&url, e)))
}

fn join_error(url: &str, error: JoinError) -> Error {
    let message = if error.is_panic() {
        "task panicked".to_string()
    } else {
        "task was cancelled".to_string()
    };
    Error::Task {
        url: url.to_string(),
        message,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why buffer_unordered and not buffered?
//    - buffer_unordered hands back whichever task finishes first
//    - We tag each result with its index, so order is restored by the slot
//      vector instead of by making fast tasks wait behind slow ones
//
// 2. Why tokio::spawn inside each task?
//    - A spawned task runs on any worker thread, not just this one
//    - If it panics, awaiting the JoinHandle gives us an Err instead of
//      unwinding through the whole pipeline
//
// 3. Why spawn_blocking for analyze()?
//    - Hashing and reading files is blocking std::fs work
//    - Running it on the blocking pool keeps the async workers free for
//      network I/O
//
// 4. What does timeout_at do?
//    - It races a future against a fixed point in time
//    - Every task shares the same point, so it acts as one global deadline
// -----------------------------------------------------------------------------
