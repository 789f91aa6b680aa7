//! Integration tests for infrastructure crate
//!
//! Tests cover:
//! - Model artifact download with wiremock
//! - Checksum verification of downloaded and existing artifacts
//! - Security validation of download settings

use std::{path::PathBuf, time::Duration};

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use infrastructure::{AppConfig, ArtifactError, Environment, ModelConfig, ModelFetcher, SecurityValidator};

const MODEL_BYTES: &[u8] = b"\x08\x07\x12\x0bsoil-export fake onnx payload";

fn fetcher() -> ModelFetcher {
    ModelFetcher::new(Duration::from_secs(10)).unwrap()
}

fn model_config(dir: &TempDir, source_url: Option<String>) -> ModelConfig {
    ModelConfig {
        path: dir.path().join("soil_model.onnx"),
        source_url,
        ..ModelConfig::default()
    }
}

fn digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

async fn serve_model(server: &MockServer, body: &[u8], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/soil_model.onnx"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// ============================================================================
// Model Fetcher Tests
// ============================================================================

mod model_fetcher_tests {
    use super::*;

    #[tokio::test]
    async fn downloads_when_file_is_absent() {
        let server = MockServer::start().await;
        serve_model(&server, MODEL_BYTES, 1).await;

        let dir = TempDir::new().unwrap();
        let config = model_config(&dir, Some(format!("{}/soil_model.onnx", server.uri())));

        let path = fetcher().ensure_present(&config).await.unwrap();

        assert_eq!(path, config.path);
        assert_eq!(std::fs::read(&path).unwrap(), MODEL_BYTES);
        assert!(!dir.path().join("soil_model.onnx.part").exists());
    }

    #[tokio::test]
    async fn skips_download_when_file_exists() {
        let server = MockServer::start().await;
        serve_model(&server, MODEL_BYTES, 0).await;

        let dir = TempDir::new().unwrap();
        let config = model_config(&dir, Some(format!("{}/soil_model.onnx", server.uri())));
        std::fs::write(&config.path, b"already here").unwrap();

        fetcher().ensure_present(&config).await.unwrap();

        assert_eq!(std::fs::read(&config.path).unwrap(), b"already here");
    }

    #[tokio::test]
    async fn refresh_on_start_replaces_existing_file() {
        let server = MockServer::start().await;
        serve_model(&server, MODEL_BYTES, 1).await;

        let dir = TempDir::new().unwrap();
        let mut config = model_config(&dir, Some(format!("{}/soil_model.onnx", server.uri())));
        config.refresh_on_start = true;
        std::fs::write(&config.path, b"stale").unwrap();

        fetcher().ensure_present(&config).await.unwrap();

        assert_eq!(std::fs::read(&config.path).unwrap(), MODEL_BYTES);
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let server = MockServer::start().await;
        serve_model(&server, MODEL_BYTES, 1).await;

        let dir = TempDir::new().unwrap();
        let mut config = model_config(&dir, Some(format!("{}/soil_model.onnx", server.uri())));
        config.path = dir.path().join("models").join("v1").join("soil_model.onnx");

        fetcher().ensure_present(&config).await.unwrap();

        assert!(config.path.exists());
    }

    #[tokio::test]
    async fn matching_checksum_is_accepted() {
        let server = MockServer::start().await;
        serve_model(&server, MODEL_BYTES, 1).await;

        let dir = TempDir::new().unwrap();
        let mut config = model_config(&dir, Some(format!("{}/soil_model.onnx", server.uri())));
        config.checksum_blake3 = Some(digest(MODEL_BYTES));

        assert!(fetcher().ensure_present(&config).await.is_ok());
    }

    #[tokio::test]
    async fn checksum_mismatch_discards_download() {
        let server = MockServer::start().await;
        serve_model(&server, MODEL_BYTES, 1).await;

        let dir = TempDir::new().unwrap();
        let mut config = model_config(&dir, Some(format!("{}/soil_model.onnx", server.uri())));
        config.checksum_blake3 = Some(digest(b"some other model"));

        let err = fetcher().ensure_present(&config).await.unwrap_err();

        assert!(matches!(err, ArtifactError::ChecksumMismatch { .. }));
        assert!(!config.path.exists());
        assert!(!dir.path().join("soil_model.onnx.part").exists());
    }

    #[tokio::test]
    async fn checksum_mismatch_keeps_previous_artifact() {
        let server = MockServer::start().await;
        serve_model(&server, MODEL_BYTES, 1).await;

        let dir = TempDir::new().unwrap();
        let mut config = model_config(&dir, Some(format!("{}/soil_model.onnx", server.uri())));
        config.refresh_on_start = true;
        config.checksum_blake3 = Some(digest(b"previous"));
        std::fs::write(&config.path, b"previous").unwrap();

        assert!(fetcher().ensure_present(&config).await.is_err());
        assert_eq!(std::fs::read(&config.path).unwrap(), b"previous");
    }

    #[tokio::test]
    async fn existing_file_with_wrong_checksum_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = model_config(&dir, None);
        config.checksum_blake3 = Some(digest(MODEL_BYTES));
        std::fs::write(&config.path, b"tampered").unwrap();

        let err = fetcher().ensure_present(&config).await.unwrap_err();

        assert!(matches!(err, ArtifactError::ChecksumMismatch { .. }));
    }

    #[tokio::test]
    async fn http_error_status_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/soil_model.onnx"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let config = model_config(&dir, Some(format!("{}/soil_model.onnx", server.uri())));

        let err = fetcher().ensure_present(&config).await.unwrap_err();

        assert!(matches!(err, ArtifactError::Http { status: 404, .. }));
        assert!(!config.path.exists());
    }

    #[tokio::test]
    async fn missing_file_without_source_fails() {
        let dir = TempDir::new().unwrap();
        let config = model_config(&dir, None);

        let err = fetcher().ensure_present(&config).await.unwrap_err();

        assert!(matches!(err, ArtifactError::MissingSource(p) if p == config.path));
    }

    #[tokio::test]
    async fn unreachable_source_is_request_error() {
        let dir = TempDir::new().unwrap();
        let config = model_config(&dir, Some("http://127.0.0.1:9/soil_model.onnx".to_string()));

        let err = fetcher().ensure_present(&config).await.unwrap_err();

        assert!(matches!(err, ArtifactError::Request(_)));
    }

    #[tokio::test]
    async fn download_reports_bytes_written() {
        let server = MockServer::start().await;
        serve_model(&server, MODEL_BYTES, 1).await;

        let dir = TempDir::new().unwrap();
        let dest: PathBuf = dir.path().join("direct.onnx");

        let written = fetcher()
            .download(&format!("{}/soil_model.onnx", server.uri()), &dest, None)
            .await
            .unwrap();

        assert_eq!(written, MODEL_BYTES.len() as u64);
    }
}

// ============================================================================
// Security Validation Tests
// ============================================================================

mod security_validation_tests {
    use super::*;

    #[test]
    fn production_download_without_checksum_blocks_startup() {
        let mut config = AppConfig {
            environment: Some(Environment::Production),
            ..AppConfig::default()
        };
        config.model.source_url = Some("https://models.example.org/soil.onnx".to_string());

        let warnings = SecurityValidator::validate(&config);

        assert!(SecurityValidator::has_blocking(&config, &warnings));
    }

    #[test]
    fn local_only_model_needs_no_checksum() {
        let config = AppConfig::default();
        let warnings = SecurityValidator::validate(&config);
        assert!(!SecurityValidator::has_blocking(&config, &warnings));
    }
}
