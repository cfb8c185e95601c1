//! Configuration loading, validation, and management for Chirp.
//!
//! Loads configuration from `~/.chirp/config.toml` with environment
//! variable overrides. Validates all settings at startup; a config that
//! fails validation is fatal and never reaches the prompt engine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.chirp/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChirpConfig {
    /// Bot identity: nickname and persona variants
    #[serde(default)]
    pub bot: BotConfig,

    /// Chat context settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Knowledge retrieval settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Associative memory recall settings
    #[serde(default)]
    pub recall: RecallConfig,

    /// Self-initiated speech settings
    #[serde(default)]
    pub initiative: InitiativeConfig,

    /// Embedding service configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// The agent's daily schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Name the agent goes by in group chats
    #[serde(default = "default_nickname")]
    pub nickname: String,

    /// Persona descriptors. Index 0 is the primary variant, index 1 the alternate.
    #[serde(default = "default_personas")]
    pub personas: Vec<String>,
}

fn default_nickname() -> String {
    "小啾".into()
}
fn default_personas() -> Vec<String> {
    vec![
        "是一个在读大学生，平时喜欢刷短视频，说话直来直去".into(),
        "是一个在读大学生，对很多事情都有自己的看法，偶尔有点毒舌".into(),
    ]
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            nickname: default_nickname(),
            personas: default_personas(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum number of recent group messages fed into a prompt
    #[serde(default = "default_max_context_size")]
    pub max_context_size: usize,
}

fn default_max_context_size() -> usize {
    15
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_context_size: default_max_context_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Minimum cosine similarity for a passage to be used
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Maximum number of passages injected
    #[serde(default = "default_knowledge_limit")]
    pub limit: usize,
}

fn default_threshold() -> f32 {
    0.5
}
fn default_knowledge_limit() -> usize {
    1
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            limit: default_knowledge_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallConfig {
    /// Graph traversal depth per topic
    #[serde(default = "default_depth")]
    pub depth: usize,

    /// Items sampled from the pooled first layer
    #[serde(default = "default_samples")]
    pub first_layer_samples: usize,

    /// Items sampled from second-layer overlaps between topics
    #[serde(default = "default_samples")]
    pub overlap_samples: usize,
}

fn default_depth() -> usize {
    2
}
fn default_samples() -> usize {
    2
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            first_layer_samples: default_samples(),
            overlap_samples: default_samples(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiativeConfig {
    /// A node qualifies as a topic only with strictly more items than this
    #[serde(default = "default_min_memory_items")]
    pub min_memory_items: usize,

    /// How many candidate topics are offered to the model
    #[serde(default = "default_candidate_count")]
    pub candidate_count: usize,

    /// How many memory items of the chosen topic go into the prompt
    #[serde(default = "default_memory_samples")]
    pub memory_samples: usize,
}

fn default_min_memory_items() -> usize {
    3
}
fn default_candidate_count() -> usize {
    5
}
fn default_memory_samples() -> usize {
    3
}

impl Default for InitiativeConfig {
    fn default() -> Self {
        Self {
            min_memory_items: default_min_memory_items(),
            candidate_count: default_candidate_count(),
            memory_samples: default_memory_samples(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding backend: "openai" or "none"
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_embedding_url")]
    pub api_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_embedding_model")]
    pub model: String,
}

fn default_embedding_provider() -> String {
    "none".into()
}
fn default_embedding_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            api_url: default_embedding_url(),
            api_key: None,
            model: default_embedding_model(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub entries: Vec<ScheduleEntry>,
}

/// One slot of the daily schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Start time, "HH:MM"
    pub start: String,

    /// What the agent does from `start` until the next entry
    pub activity: String,
}

impl ChirpConfig {
    /// Load configuration from the default path (~/.chirp/config.toml).
    ///
    /// Environment variables override the file:
    /// - `CHIRP_NICKNAME`
    /// - `CHIRP_EMBEDDING_API_KEY` (falls back to `OPENAI_API_KEY`)
    /// - `CHIRP_EMBEDDING_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(nickname) = std::env::var("CHIRP_NICKNAME") {
            config.bot.nickname = nickname;
        }

        if config.embedding.api_key.is_none() {
            config.embedding.api_key = std::env::var("CHIRP_EMBEDDING_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(url) = std::env::var("CHIRP_EMBEDDING_URL") {
            config.embedding.api_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".chirp")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.personas.len() < 2 {
            return Err(ConfigError::ValidationError(format!(
                "bot.personas needs at least 2 variants, found {}",
                self.bot.personas.len()
            )));
        }

        if self.bot.nickname.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "bot.nickname must not be empty".into(),
            ));
        }

        if self.chat.max_context_size == 0 {
            return Err(ConfigError::ValidationError(
                "chat.max_context_size must be > 0".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.knowledge.threshold) {
            return Err(ConfigError::ValidationError(
                "knowledge.threshold must be between 0.0 and 1.0".into(),
            ));
        }

        if self.knowledge.limit == 0 {
            return Err(ConfigError::ValidationError(
                "knowledge.limit must be >= 1".into(),
            ));
        }

        if self.initiative.candidate_count == 0 {
            return Err(ConfigError::ValidationError(
                "initiative.candidate_count must be >= 1".into(),
            ));
        }

        if self.initiative.memory_samples == 0 {
            return Err(ConfigError::ValidationError(
                "initiative.memory_samples must be >= 1".into(),
            ));
        }

        if self.recall.depth < 2 {
            return Err(ConfigError::ValidationError(format!(
                "recall.depth must be >= 2 for overlap detection, found {}",
                self.recall.depth
            )));
        }

        for entry in &self.schedule.entries {
            if !is_clock_time(&entry.start) {
                return Err(ConfigError::ValidationError(format!(
                    "schedule entry start '{}' is not HH:MM",
                    entry.start
                )));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for ChirpConfig {
    fn default() -> Self {
        Self {
            bot: BotConfig::default(),
            chat: ChatConfig::default(),
            knowledge: KnowledgeConfig::default(),
            recall: RecallConfig::default(),
            initiative: InitiativeConfig::default(),
            embedding: EmbeddingConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

fn is_clock_time(s: &str) -> bool {
    let Some((h, m)) = s.split_once(':') else {
        return false;
    };
    matches!((h.parse::<u32>(), m.parse::<u32>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
