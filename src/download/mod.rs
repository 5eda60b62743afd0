// src/download/mod.rs
// =============================================================================
// This module downloads files and runs the statistics on them.
//
// Submodules:
// - fetch: one HTTP GET, body written verbatim to a destination file
// - pipeline: runs fetch + analyze for a whole URL list concurrently and
//   returns the results in the same order as the input
//
// Rust concepts:
// - pub use: re-export so callers write `download::Pipeline`
// =============================================================================

mod fetch;
mod pipeline;

pub use pipeline::Pipeline;
