//! Application configuration, read from a RON file.
//!
//! Precedence, lowest first: built-in defaults, the config file, the
//! `AUDIT_API_URL` environment variable, command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use audit_core::LinkRequestParams;
use audit_engine::{ClientSettings, DEFAULT_BASE_URL};
use audit_logging::{audit_info, audit_warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "audit.ron";
pub const API_URL_ENV: &str = "AUDIT_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub output_dir: PathBuf,
    pub min_similarity: f64,
    pub threshold: f64,
    pub max_links_per_page: u32,
    pub same_language_only: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let links = LinkRequestParams::default();
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_response_bytes: client.max_response_bytes,
            output_dir: PathBuf::from("./output"),
            min_similarity: 0.7,
            threshold: 0.7,
            max_links_per_page: links.max_links_per_page,
            same_language_only: links.same_language_only,
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_response_bytes: self.max_response_bytes,
        }
    }

    pub fn link_params(&self) -> LinkRequestParams {
        LinkRequestParams {
            max_links_per_page: self.max_links_per_page,
            same_language_only: self.same_language_only,
        }
    }

    /// Longest a workflow may stay busy before the session gives up on it.
    pub fn wait_limit(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_secs
                .saturating_add(self.request_timeout_secs)
                .saturating_add(5),
        )
    }

    /// Overrides the service URL with a non-blank environment value.
    pub fn apply_env_api_url(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|url| !url.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
    }
}

/// Loads the config at `path`. A missing file yields the defaults; an
/// unreadable or malformed one is logged and also yields the defaults.
pub fn load(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            audit_info!("No config at {:?}, using defaults", path);
            return AppConfig::default();
        }
        Err(err) => {
            audit_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            audit_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            audit_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
