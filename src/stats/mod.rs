// src/stats/mod.rs
// =============================================================================
// This module computes statistics for a file that is already on disk.
//
// Submodules:
// - hasher: SHA-256 digest of a file, read in fixed-size chunks
// - analyzer: builds a FileRecord (name, digest, size, word counts, date)
//
// Nothing in here touches the network. The download module calls into this
// one once a file has been written.
// =============================================================================

mod analyzer;
mod hasher;

pub use analyzer::{analyze, FileRecord};
