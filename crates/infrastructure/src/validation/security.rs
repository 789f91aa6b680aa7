//! Security validation for application configuration
//!
//! Validates configuration for security issues and provides warnings at startup.
//! Critical issues in production will prevent startup.

use std::fmt;

use crate::config::{AppConfig, Environment};

/// Severity level for security warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarningSeverity {
    /// Informational - no action required
    Info,
    /// Warning - should be addressed but not critical
    Warning,
    /// Critical - must be addressed in production
    Critical,
}

impl fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A security warning with severity and description
#[derive(Debug, Clone)]
pub struct SecurityWarning {
    /// Severity level of the warning
    pub severity: WarningSeverity,
    /// Short code identifying the warning type
    pub code: &'static str,
    /// Human-readable description of the issue
    pub message: String,
    /// Recommended action to resolve the issue
    pub recommendation: &'static str,
}

impl SecurityWarning {
    fn new(
        severity: WarningSeverity,
        code: &'static str,
        message: impl Into<String>,
        recommendation: &'static str,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            recommendation,
        }
    }

    /// Check if this warning is critical
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self.severity, WarningSeverity::Critical)
    }
}

impl fmt::Display for SecurityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} - {}",
            self.severity, self.code, self.message, self.recommendation
        )
    }
}

/// Validates application configuration for security issues
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityValidator;

impl SecurityValidator {
    /// Validate configuration and return all security warnings
    ///
    /// Returns a list of warnings sorted by severity (critical first).
    #[must_use]
    pub fn validate(config: &AppConfig) -> Vec<SecurityWarning> {
        let mut warnings = Vec::new();
        let is_production = config.environment() == Environment::Production;

        Self::check_artifact_integrity(config, is_production, &mut warnings);
        Self::check_cors_configuration(config, is_production, &mut warnings);
        Self::check_upload_limit(config, &mut warnings);

        warnings.sort_by(|a, b| b.severity.cmp(&a.severity));
        warnings
    }

    /// Whether any warning should block startup
    #[must_use]
    pub fn has_blocking(config: &AppConfig, warnings: &[SecurityWarning]) -> bool {
        config.environment() == Environment::Production
            && warnings.iter().any(SecurityWarning::is_critical)
    }

    fn check_artifact_integrity(
        config: &AppConfig,
        is_production: bool,
        warnings: &mut Vec<SecurityWarning>,
    ) {
        let Some(url) = config.model.source_url.as_deref() else {
            return;
        };

        if config.model.checksum_blake3.is_none() {
            let severity = if is_production {
                WarningSeverity::Critical
            } else {
                WarningSeverity::Warning
            };
            warnings.push(SecurityWarning::new(
                severity,
                "MODEL_CHECKSUM_MISSING",
                "Model artifact is downloaded without integrity verification",
                "Set model.checksum_blake3 to the expected BLAKE3 digest",
            ));
        }

        if url.starts_with("http://") {
            warnings.push(SecurityWarning::new(
                WarningSeverity::Warning,
                "MODEL_SOURCE_PLAINTEXT",
                format!("Model source {url} uses plain HTTP"),
                "Serve the model artifact over HTTPS",
            ));
        }
    }

    fn check_cors_configuration(
        config: &AppConfig,
        is_production: bool,
        warnings: &mut Vec<SecurityWarning>,
    ) {
        if is_production && config.server.allowed_origins.is_empty() {
            warnings.push(SecurityWarning::new(
                WarningSeverity::Warning,
                "CORS_ALLOW_ALL",
                "CORS allows requests from any origin",
                "List trusted origins in server.allowed_origins",
            ));
        }
    }

    fn check_upload_limit(config: &AppConfig, warnings: &mut Vec<SecurityWarning>) {
        if config.server.max_upload_bytes == 0 {
            warnings.push(SecurityWarning::new(
                WarningSeverity::Critical,
                "UPLOAD_LIMIT_ZERO",
                "server.max_upload_bytes is 0, every upload will be rejected",
                "Set server.max_upload_bytes to a positive size",
            ));
        }
    }
}
