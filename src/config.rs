//! Runtime configuration.
//!
//! Values come from three layers, later ones winning: built-in
//! defaults, a `secrets.toml` file, then the environment. CLI flags
//! are applied on top by the binary.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::extraction::pdfium::DEFAULT_RENDER_DPI;
use crate::pipeline::synopsis::gemini::{
    DEFAULT_API_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};

/// Application-level constants
pub const APP_NAME: &str = "minuta";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter: quiet except for this crate.
pub fn default_log_filter() -> &'static str {
    "warn,minuta=info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("No Gemini API key configured. Set GEMINI_API_KEY or add it to secrets.toml")]
    MissingApiKey,
}

/// Resolved runtime configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    /// Access code expected by the gate, from `secrets.toml` only.
    /// `None` disables the gate.
    pub access_code: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub render_dpi: u32,
}

// Secrets never end up in logs, so Debug is written by hand.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field(
                "access_code",
                &self.access_code.as_ref().map(|_| "<redacted>"),
            )
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("render_dpi", &self.render_dpi)
            .finish()
    }
}

/// On-disk shape of `secrets.toml`. Key names keep their historical
/// upper-case form.
#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(rename = "GEMINI_API_KEY")]
    gemini_api_key: Option<String>,
    #[serde(rename = "ACCESS_CODE")]
    access_code: Option<String>,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// With an explicit `path`, that file must exist and parse.
    /// Without one, `./secrets.toml` and `<config dir>/minuta/secrets.toml`
    /// are tried in order; a missing default file is fine, a malformed
    /// one is not.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let secrets = match path {
            Some(p) => read_secrets(p)?,
            None => {
                let mut found = SecretsFile::default();
                for candidate in default_secret_paths() {
                    if candidate.exists() {
                        found = read_secrets(&candidate)?;
                        tracing::debug!(path = %candidate.display(), "Loaded secrets file");
                        break;
                    }
                }
                found
            }
        };

        resolve(secrets, std::env::var("GEMINI_API_KEY").ok())
    }
}

/// Combine file and environment values into the final configuration.
/// The environment wins over the file; empty strings count as unset.
fn resolve(secrets: SecretsFile, env_api_key: Option<String>) -> Result<AppConfig, ConfigError> {
    let api_key = env_api_key
        .filter(|k| !k.is_empty())
        .or_else(|| secrets.gemini_api_key.filter(|k| !k.is_empty()))
        .ok_or(ConfigError::MissingApiKey)?;

    let access_code = secrets.access_code.filter(|c| !c.is_empty());

    Ok(AppConfig {
        api_key,
        access_code,
        model: DEFAULT_MODEL.to_string(),
        api_base_url: DEFAULT_API_BASE_URL.to_string(),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        render_dpi: DEFAULT_RENDER_DPI,
    })
}

/// Candidate locations for the default secrets file.
fn default_secret_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("secrets.toml")];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_NAME).join("secrets.toml"));
    }
    paths
}

fn read_secrets(path: &Path) -> Result<SecretsFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
