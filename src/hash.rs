//! BLAKE3 hashing utilities for manifests and archives

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{Result, io_error};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate BLAKE3 hash of an in-memory buffer
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{}{}", HASH_PREFIX, blake3::hash(bytes).to_hex())
}

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path)
        .map_err(|e| io_error(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| io_error(format!("Failed to read {}: {}", path.display(), e)))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Verify a hash matches the expected value
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    let normalize = |h: &str| {
        if h.starts_with(HASH_PREFIX) {
            h.to_string()
        } else {
            format!("{}{}", HASH_PREFIX, h)
        }
    };

    normalize(expected) == normalize(actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_file_matches_hash_bytes() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.txt");
        std::fs::write(&file_path, "test content").unwrap();

        let hash = hash_file(&file_path).unwrap();
        assert!(hash.starts_with(HASH_PREFIX));
        assert_eq!(hash, hash_bytes(b"test content"));
    }

    #[test]
    fn test_hash_file_not_found() {
        let result = hash_file(Path::new("/nonexistent/file.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_bytes_deterministic() {
        assert_eq!(hash_bytes(b"aaa"), hash_bytes(b"aaa"));
        assert_ne!(hash_bytes(b"aaa"), hash_bytes(b"bbb"));
    }

    #[test]
    fn test_verify_hash() {
        let hash = "blake3:abc123";
        assert!(verify_hash(hash, "blake3:abc123"));
        assert!(verify_hash(hash, "abc123"));
        assert!(verify_hash("abc123", hash));
        assert!(!verify_hash(hash, "blake3:def456"));
    }
}
