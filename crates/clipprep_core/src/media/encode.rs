//! Rendering artifacts as base64 for API payloads.

use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

/// A specific artifact could not be read.
///
/// Only that artifact is unavailable; the rest of the result stays valid.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Artifact not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read artifact {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Read the whole file at `path` and return it base64-encoded.
pub async fn encode_file(path: &Path) -> EncodeResult<String> {
    let bytes = tokio::fs::read(path).await.map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            EncodeError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            EncodeError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    Ok(BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn encodes_file_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame_1.jpg");
        std::fs::write(&path, b"hello").unwrap();

        assert_eq!(encode_file(&path).await.unwrap(), "aGVsbG8=");
    }

    #[tokio::test]
    async fn empty_file_encodes_to_empty_string() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(encode_file(&path).await.unwrap(), "");
    }

    #[tokio::test]
    async fn deleted_artifact_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audio.mp3");

        let err = encode_file(&path).await.unwrap_err();
        assert!(matches!(err, EncodeError::NotFound { .. }));
        assert!(err.to_string().contains("audio.mp3"));
    }

    #[tokio::test]
    async fn directory_is_unreadable() {
        let dir = tempdir().unwrap();
        let err = encode_file(dir.path()).await.unwrap_err();
        assert!(matches!(err, EncodeError::Unreadable { .. }));
    }
}
