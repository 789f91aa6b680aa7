//! BLAKE3 digests of artifact files

use std::{fs::File, io, path::Path};

use super::ArtifactError;

/// Compute the hex BLAKE3 digest of a file on the blocking pool
pub async fn blake3_file_digest(path: &Path) -> io::Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut file = File::open(path)?;
        let mut hasher = blake3::Hasher::new();
        io::copy(&mut file, &mut hasher)?;
        Ok(hasher.finalize().to_hex().to_string())
    })
    .await
    .map_err(io::Error::other)?
}

/// Check a file against an expected hex digest (case-insensitive)
pub async fn verify_checksum(path: &Path, expected: &str) -> Result<(), ArtifactError> {
    let actual = blake3_file_digest(path).await?;
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(ArtifactError::ChecksumMismatch {
            expected: expected.trim().to_string(),
            actual,
        })
    }
}
