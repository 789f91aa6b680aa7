//! Soil classifier CLI
//!
//! Command-line interface for fetching the model, classifying local images
//! and querying a running server.

#![allow(clippy::print_stdout)]

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use application::{ClassificationService, ClassifierPort};
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, LogFormat, ModelFetcher, OnnxClassifierAdapter, init_telemetry};
use serde::Serialize;
use tracing::{debug, info};

const DEFAULT_URL: &str = "http://localhost:10000";

/// Soil classifier CLI
#[derive(Parser)]
#[command(name = "soil-classifier-cli")]
#[command(author, version, about = "Soil image classifier CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "SOILCLASS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the model artifact if it is missing
    ///
    /// Uses model.source_url and verifies model.checksum_blake3 when set.
    FetchModel,

    /// Classify a local image with the local model
    Classify {
        /// Image file to classify
        image: PathBuf,
    },

    /// Upload an image to a running server
    Predict {
        /// Image file to upload
        image: PathBuf,

        /// Server URL
        #[arg(short, long, default_value = DEFAULT_URL)]
        url: String,
    },

    /// Check server readiness (used by container healthchecks)
    Health {
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_URL)]
        url: String,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Local classification output
#[derive(Debug, Serialize)]
struct ClassifyOutput {
    soil_type: &'static str,
    description: &'static str,
    class_index: usize,
    confidence: f32,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AppConfig::load().context("Failed to load configuration")?,
    };
    Ok(config)
}

fn render_config(config: &AppConfig) -> anyhow::Result<String> {
    toml::to_string_pretty(config).context("Failed to render configuration")
}

async fn fetch_model(config: &AppConfig) -> anyhow::Result<PathBuf> {
    let fetcher = ModelFetcher::from_config(&config.model)?;
    let path = fetcher
        .ensure_present(&config.model)
        .await
        .context("Failed to obtain model artifact")?;
    Ok(path)
}

async fn classify_local(config: &AppConfig, image: &Path) -> anyhow::Result<ClassifyOutput> {
    let model_path = fetch_model(config).await?;
    let input_size = config.model.input_size;

    let adapter =
        tokio::task::spawn_blocking(move || OnnxClassifierAdapter::load(&model_path, input_size))
            .await
            .context("Model loading task failed")?
            .context("Failed to load classifier model")?;
    let classifier: Arc<dyn ClassifierPort> = Arc::new(adapter);
    let service = ClassificationService::new(classifier);

    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    debug!(bytes = bytes.len(), "Image read");

    let prediction = service.classify_image(bytes).await?;
    Ok(ClassifyOutput {
        soil_type: prediction.label(),
        description: prediction.description(),
        class_index: prediction.class_index(),
        confidence: prediction.confidence,
    })
}

fn upload_part(image: &Path, bytes: Vec<u8>) -> reqwest::multipart::Part {
    let file_name = image
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
    reqwest::multipart::Part::bytes(bytes).file_name(file_name)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    init_telemetry(LogFormat::Text, log_filter_from_verbosity(cli.verbose))?;

    match cli.command {
        Commands::FetchModel => {
            let config = load_config(cli.config.as_deref())?;
            let path = fetch_model(&config).await?;
            println!("✅ Model ready at {}", path.display());
        },

        Commands::Classify { image } => {
            let config = load_config(cli.config.as_deref())?;
            let output = classify_local(&config, &image).await?;
            info!(soil_type = output.soil_type, "Local classification finished");
            println!("{}", serde_json::to_string_pretty(&output)?);
        },

        Commands::Predict { image, url } => {
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("Failed to read {}", image.display()))?;
            let form = reqwest::multipart::Form::new().part("file", upload_part(&image, bytes));

            let resp = reqwest::Client::new()
                .post(endpoint_url(&url, "/predict"))
                .multipart(form)
                .send()
                .await?;
            let status = resp.status();
            let body = resp.json::<serde_json::Value>().await?;

            println!("{}", serde_json::to_string_pretty(&body)?);
            if !status.is_success() {
                println!("❌ Server answered HTTP {status}");
                std::process::exit(1);
            }
        },

        Commands::Health { url } => {
            match reqwest::Client::new()
                .get(endpoint_url(&url, "/ready"))
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {
                    println!("✅ Healthy");
                },
                Ok(resp) => {
                    println!("❌ Unhealthy: HTTP {}", resp.status());
                    std::process::exit(1);
                },
                Err(e) => {
                    println!("❌ Unhealthy: {e}");
                    std::process::exit(1);
                },
            }
        },

        Commands::Config => {
            let config = load_config(cli.config.as_deref())?;
            print!("{}", render_config(&config)?);
        },
    }

    Ok(())
}
