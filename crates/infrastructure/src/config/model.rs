//! Model artifact configuration.

use std::{path::PathBuf, time::Duration};

use application::DEFAULT_INPUT_SIZE;
use serde::{Deserialize, Serialize};

/// Where the classifier artifact lives and how to obtain it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Local path of the ONNX model file
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Remote URL to download the artifact from when it is missing
    #[serde(default)]
    pub source_url: Option<String>,

    /// Expected BLAKE3 digest of the artifact (hex)
    #[serde(default)]
    pub checksum_blake3: Option<String>,

    /// Download again even if the local file exists
    #[serde(default)]
    pub refresh_on_start: bool,

    /// Download timeout in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// Square input edge length expected by the model
    #[serde(default = "default_input_size")]
    pub input_size: u32,
}

fn default_path() -> PathBuf {
    PathBuf::from("soil_model.onnx")
}

const fn default_download_timeout() -> u64 {
    300
}

const fn default_input_size() -> u32 {
    DEFAULT_INPUT_SIZE
}

impl ModelConfig {
    /// Download timeout as a `Duration`
    #[must_use]
    pub const fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            source_url: None,
            checksum_blake3: None,
            refresh_on_start: false,
            download_timeout_secs: default_download_timeout(),
            input_size: default_input_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = ModelConfig::default();
        assert_eq!(config.path, PathBuf::from("soil_model.onnx"));
        assert!(config.source_url.is_none());
        assert!(!config.refresh_on_start);
        assert_eq!(config.input_size, 200);
        assert_eq!(config.download_timeout(), Duration::from_secs(300));
    }
}
