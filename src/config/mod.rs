//! Configuration loaded from an optional TOML file.
//!
//! Every field has a default, so a file only needs the keys it changes.
//! CLI flags and environment variables are layered on top in `main`.
//! The API key never lives in the file; it is passed in explicitly via
//! [`Config::completion_config`].

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_API_URL, DEFAULT_BIND, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_PORT,
};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub completion: CompletionSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum request body size (in bytes), uploads included.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

/// Upstream completion settings (everything except the credential).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout for the upstream call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Everything a completion client needs, credential included.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_upload_size() -> usize {
    20 * 1024 * 1024 // 20 MB
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// `bind:port`, ready for `TcpListener::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Bind these settings to a credential.
    pub fn completion_config(&self, api_key: impl Into<String>) -> CompletionConfig {
        CompletionConfig {
            api_key: api_key.into(),
            api_url: self.completion.api_url.clone(),
            model: self.completion.model.clone(),
            max_tokens: self.completion.max_tokens,
            timeout: Duration::from_secs(self.completion.timeout_secs),
        }
    }
}
