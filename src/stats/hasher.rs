// src/stats/hasher.rs
// =============================================================================
// SHA-256 digest of a file.
//
// The file is read in CHUNK_SIZE pieces and each piece is fed to the hasher,
// so memory use stays the same no matter how large the download was.
// =============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

const CHUNK_SIZE: usize = 8192;

/// Computes the SHA-256 of the file at `path` as lowercase hex.
pub fn digest(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf).map_err(|e| Error::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_digest_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(
            digest(f.path()).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        assert_eq!(
            digest(f.path()).unwrap(),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn test_digest_is_deterministic_across_chunks() {
        // Larger than one chunk so the loop runs more than once
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&vec![b'x'; CHUNK_SIZE * 3 + 17]).unwrap();
        f.flush().unwrap();

        let first = digest(f.path()).unwrap();
        let second = digest(f.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_digest_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = digest(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
