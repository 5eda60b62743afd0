// src/sources.rs
// =============================================================================
// Reads the list of URLs to process.
//
// Format: one URL per line, no comments. Surrounding whitespace is trimmed,
// blank lines (including a trailing newline) are skipped.
//
// Every line must be an http:// or https:// URL. A bad line fails the whole
// run, because there is no sensible partial result for a broken URL list.
// =============================================================================

use std::path::Path;

use url::Url;

use crate::error::{Error, Result};

/// Reads and validates the URL list at `path`.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("cannot read URL list {}: {}", path.display(), e))
    })?;
    parse_url_list(&content)
}

/// Parses URL list text, keeping the original order.
pub fn parse_url_list(content: &str) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parsed = Url::parse(line)
            .map_err(|e| Error::Config(format!("line {}: invalid URL '{}': {}", line_no + 1, line, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::Config(format!(
                "line {}: unsupported scheme '{}' in '{}'",
                line_no + 1,
                parsed.scheme(),
                line
            )));
        }

        urls.push(line.to_string());
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_order_and_tolerates_trailing_newline() {
        let urls = parse_url_list("http://x/a.txt\nhttps://x/b.txt\n").unwrap();
        assert_eq!(urls, vec!["http://x/a.txt", "https://x/b.txt"]);
    }

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let urls = parse_url_list("  http://x/a.txt  \r\n\n\nhttp://x/b.txt").unwrap();
        assert_eq!(urls, vec!["http://x/a.txt", "http://x/b.txt"]);
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let urls = parse_url_list("http://x/a.txt\nhttp://x/a.txt\n").unwrap();
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_url_list("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage_with_line_number() {
        let err = parse_url_list("http://x/a.txt\nnot a url\n").unwrap_err();
        match err {
            Error::Config(message) => assert!(message.starts_with("line 2:")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_non_http_scheme() {
        assert!(parse_url_list("ftp://x/a.txt").is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_url_list(&dir.path().join("urls.txt"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
