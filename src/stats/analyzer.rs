// src/stats/analyzer.rs
// =============================================================================
// This module turns a downloaded file into a FileRecord.
//
// For each file we report:
// - the file name (just the last path component)
// - the SHA-256 digest (see hasher.rs)
// - the size in bytes
// - how many words it has, and how many of them are distinct
// - today's date
//
// A "word" is anything between runs of whitespace. Case and punctuation are
// kept, so "Word", "word" and "word." are three different words.
//
// Rust concepts:
// - serde rename: the JSON keys are the same column names the CSV uses
// - HashSet<&str>: counts distinct words without copying them
// =============================================================================

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use super::hasher::digest;
use crate::error::{Error, Result};

/// The statistics for one downloaded file.
///
/// Fields are private so a record cannot change after it is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    #[serde(rename = "File name")]
    file_name: String,
    #[serde(rename = "Sha256 hexdigest")]
    sha256: String,
    #[serde(rename = "File size")]
    size: u64,
    #[serde(rename = "Word count")]
    word_count: usize,
    #[serde(rename = "Number of unique words")]
    unique_words: usize,
    #[serde(rename = "Todays date")]
    date: NaiveDate,
}

impl FileRecord {
    pub fn new(
        file_name: String,
        sha256: String,
        size: u64,
        word_count: usize,
        unique_words: usize,
        date: NaiveDate,
    ) -> Self {
        Self {
            file_name,
            sha256,
            size,
            word_count,
            unique_words,
            date,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn unique_words(&self) -> usize {
        self.unique_words
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

// Analyzes the file at `path`
//
// The file is read twice: once by the hasher (in chunks) and once here to
// count words. Bytes that are not valid UTF-8 are replaced rather than
// failing the whole record.
//
// This is blocking file I/O. The pipeline calls it from spawn_blocking.
pub fn analyze(path: &Path) -> Result<FileRecord> {
    let sha256 = digest(path)?;

    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let content = String::from_utf8_lossy(&bytes);
    let (word_count, unique_words) = word_stats(&content);

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FileRecord {
        file_name,
        sha256,
        size: bytes.len() as u64,
        word_count,
        unique_words,
        date: chrono::Local::now().date_naive(),
    })
}

/// Returns `(word_count, unique_word_count)` for `content`.
pub fn word_stats(content: &str) -> (usize, usize) {
    let mut unique = HashSet::new();
    let mut count = 0;
    for word in content.split_whitespace() {
        count += 1;
        unique.insert(word);
    }
    (count, unique.len())
}
