//! Process-wide settings, resolved once at startup.

use crate::error::PredictError;
use anyhow::{Context, Result};
use directories_next::ProjectDirs;
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Endpoint used when neither the config file nor the environment set one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/predict";
/// Environment variable overriding the endpoint. Set-but-blank disables it.
pub const ENDPOINT_ENV: &str = "ARECANUT_API_URL";
/// Multipart field name the classification service expects.
pub const DEFAULT_UPLOAD_FIELD: &str = "file";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings shared by the UI and the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Raw endpoint address; `None` means explicitly unconfigured.
    pub endpoint: Option<String>,
    pub upload_field: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
        }
    }
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    endpoint: Option<String>,
    upload_field: Option<String>,
}

impl AppConfig {
    /// Defaults, then the user config file, then the environment.
    pub fn load() -> Self {
        let path = Self::default_config_path();
        let env_endpoint = std::env::var(ENDPOINT_ENV).ok();
        Self::from_sources(path.as_deref(), env_endpoint)
    }

    /// Platform location of `config.toml`, if a home directory is known.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ArecaScan").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Layers the optional file and the optional environment value over the defaults.
    pub fn from_sources(file: Option<&Path>, env_endpoint: Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(path) = file
            && path.exists()
        {
            match read_file_config(path) {
                Ok(fc) => cfg.apply_file(fc),
                Err(e) => tracing::warn!("Ignoring config file {}: {e:#}", path.display()),
            }
        }

        if let Some(value) = env_endpoint {
            cfg.endpoint = non_blank(value);
        }

        tracing::debug!(endpoint = ?cfg.endpoint, field = %cfg.upload_field, "configuration resolved");
        cfg
    }

    fn apply_file(&mut self, fc: FileConfig) {
        if let Some(endpoint) = fc.endpoint {
            self.endpoint = non_blank(endpoint);
        }
        if let Some(field) = fc.upload_field {
            match non_blank(field) {
                Some(field) => self.upload_field = field,
                None => tracing::warn!("Blank upload_field in config file; keeping \"{}\"", self.upload_field),
            }
        }
    }

    /// Parses the endpoint, or reports why no request may be sent.
    pub fn endpoint_url(&self) -> Result<Url, PredictError> {
        let raw = self.endpoint.as_deref().ok_or(PredictError::NotConfigured)?;
        let url = Url::parse(raw).map_err(|e| PredictError::InvalidEndpoint(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(PredictError::InvalidEndpoint(format!(
                "unsupported scheme \"{other}\""
            ))),
        }
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("cannot parse {}", path.display()))
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
