
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Default percentile of the adjacent-distance distribution used as the
/// boundary cutoff. Document-local; overridable via `[chunking]
/// boundary_percentile`.
pub const DEFAULT_BOUNDARY_PERCENTILE: f64 = 95.0;

/// Default number of consecutive sentences per sliding window.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            model: "nomic-embed-text:latest".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Sentences per sliding window.
    pub window_size: usize,
    /// Percentile cutoff for boundary detection, exclusive of 0 and 100.
    pub boundary_percentile: f64,
    /// Batch size for window embeddings. Window texts are short, so batches
    /// can be large.
    pub window_batch_size: usize,
    /// Batch size for chunk re-embeddings. Chunk texts are long, so batches
    /// stay small.
    pub chunk_batch_size: usize,
    /// Whether to re-embed assembled chunks before returning them.
    pub embed_chunks: bool,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            boundary_percentile: DEFAULT_BOUNDARY_PERCENTILE,
            window_batch_size: 512,
            chunk_batch_size: 16,
            embed_chunks: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts for the transient-prone pipeline stages.
    pub max_attempts: u32,
    /// Fixed delay between attempts, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    #[inline]
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 500,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid window size: {0} (must be at least 1)")]
    InvalidWindowSize(usize),
    #[error("Invalid boundary percentile: {0} (must be greater than 0 and less than 100)")]
    InvalidPercentile(f64),
    #[error("Invalid window batch size: {0} (must be between 1 and 2048)")]
    InvalidWindowBatchSize(usize),
    #[error("Invalid chunk batch size: {0} (must be between 1 and 256)")]
    InvalidChunkBatchSize(usize),
    #[error("Invalid retry attempts: {0} (must be at least 1)")]
    InvalidRetryAttempts(u32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Get the platform configuration directory for semchunk
#[inline]
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir()
        .ok_or(ConfigError::DirectoryError)?
        .join("semchunk");
    std::fs::create_dir_all(&dir).map_err(|_| ConfigError::DirectoryError)?;
    Ok(dir)
}

impl Config {
    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join("config.toml");

        if !config_path.exists() {
            return Ok(Self {
                ollama: OllamaConfig::default(),
                chunking: ChunkingConfig::default(),
                retry: RetryConfig::default(),
                base_dir: config_dir.as_ref().to_path_buf(),
            });
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                self.base_dir.display()
            )
        })?;

        let config_path = self.base_dir.join("config.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ollama.validate()?;
        self.chunking.validate()?;

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidRetryAttempts(self.retry.max_attempts));
        }

        Ok(())
    }

    /// Path of the SQLite file backing the chunk cache
    #[inline]
    pub fn cache_database_path(&self) -> PathBuf {
        self.base_dir.join("chunks.db")
    }
}

impl OllamaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidProtocol(self.protocol.clone()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))?;

        Ok(())
    }

    pub fn ollama_url(&self) -> Result<Url, ConfigError> {
        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidWindowSize(self.window_size));
        }

        if self.boundary_percentile <= 0.0 || self.boundary_percentile >= 100.0 {
            return Err(ConfigError::InvalidPercentile(self.boundary_percentile));
        }

        if !(1..=2048).contains(&self.window_batch_size) {
            return Err(ConfigError::InvalidWindowBatchSize(self.window_batch_size));
        }

        if !(1..=256).contains(&self.chunk_batch_size) {
            return Err(ConfigError::InvalidChunkBatchSize(self.chunk_batch_size));
        }

        Ok(())
    }
}
