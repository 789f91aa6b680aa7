//! Model artifact download

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use application::ApplicationError;
use futures::StreamExt;
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

use super::checksum::verify_checksum;
use crate::config::ModelConfig;

/// Errors raised while obtaining the model artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The artifact is missing locally and no download source is configured
    #[error("Model file {0} not found and no source_url configured")]
    MissingSource(PathBuf),

    /// The download source answered with a non-success status
    #[error("Download from {url} failed with HTTP status {status}")]
    Http { url: String, status: u16 },

    /// Transport-level failure talking to the download source
    #[error("Download request failed: {0}")]
    Request(String),

    /// The artifact digest does not match the configured checksum
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Local filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<ArtifactError> for ApplicationError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::MissingSource(_) => Self::Configuration(err.to_string()),
            other => Self::ModelArtifact(other.to_string()),
        }
    }
}

/// Downloads the classifier artifact when it is not already on disk
#[derive(Debug, Clone)]
pub struct ModelFetcher {
    client: reqwest::Client,
}

impl ModelFetcher {
    /// Create a fetcher whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ArtifactError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("soil-classifier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ArtifactError::Request(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create a fetcher using the configured download timeout
    pub fn from_config(config: &ModelConfig) -> Result<Self, ArtifactError> {
        Self::new(config.download_timeout())
    }

    /// Make sure the artifact exists at `config.path`, downloading it if needed
    ///
    /// An existing file is reused unless `refresh_on_start` is set. When a
    /// checksum is configured, both reused and downloaded files are verified.
    #[instrument(skip(self, config), fields(path = %config.path.display()))]
    pub async fn ensure_present(&self, config: &ModelConfig) -> Result<PathBuf, ArtifactError> {
        let path = &config.path;
        let exists = fs::try_exists(path).await?;

        if exists && !config.refresh_on_start {
            if let Some(expected) = config.checksum_blake3.as_deref() {
                verify_checksum(path, expected).await?;
            }
            debug!("Model artifact already present, skipping download");
            return Ok(path.clone());
        }

        let Some(url) = config.source_url.as_deref() else {
            return Err(ArtifactError::MissingSource(path.clone()));
        };

        self.download(url, path, config.checksum_blake3.as_deref())
            .await?;
        Ok(path.clone())
    }

    /// Download `url` to `dest`, returning the number of bytes written
    ///
    /// The body is streamed into a `.part` file next to `dest` and renamed
    /// into place only after the checksum (if any) matches, so a failed
    /// download never replaces a previous artifact.
    #[instrument(skip(self, dest, expected), fields(dest = %dest.display()))]
    pub async fn download(
        &self,
        url: &str,
        dest: &Path,
        expected: Option<&str>,
    ) -> Result<u64, ArtifactError> {
        info!("Downloading model artifact");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ArtifactError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArtifactError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let part = partial_path(dest);
        let written = match write_body(response, &part, expected).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&part).await {
                    warn!(error = %cleanup, "Failed to remove partial download");
                }
                return Err(e);
            },
        };

        fs::rename(&part, dest).await?;
        info!(bytes = written, "Model artifact downloaded");
        Ok(written)
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

async fn write_body(
    response: reqwest::Response,
    part: &Path,
    expected: Option<&str>,
) -> Result<u64, ArtifactError> {
    let mut file = fs::File::create(part).await?;
    let mut hasher = blake3::Hasher::new();
    let mut written = 0u64;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ArtifactError::Request(e.to_string()))?;
        hasher.update(&chunk);
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.sync_all().await?;

    if let Some(expected) = expected {
        let actual = hasher.finalize().to_hex().to_string();
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            return Err(ArtifactError::ChecksumMismatch {
                expected: expected.trim().to_string(),
                actual,
            });
        }
    }

    Ok(written)
}
