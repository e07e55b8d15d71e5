//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Every section is `#[serde(default)]`, so a `settings.toml` only needs the
//! keys that differ from the defaults (typically the API credentials).

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// WikiConfig
// ---------------------------------------------------------------------------

/// Settings for the encyclopedia lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Default article language (Wikipedia subdomain, e.g. `"ru"`).
    pub language: String,
    /// MediaWiki Action API endpoint.  `{lang}` is replaced by the article
    /// language on every request.
    pub api_url: String,
    /// `User-Agent` header; Wikimedia rejects anonymous clients.
    pub user_agent: String,
    /// Excerpts are cut at the first `.` at or after this many characters.
    pub excerpt_min_length: usize,
    /// Maximum seconds to wait for one API response.
    pub timeout_secs: u64,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            language: "ru".into(),
            api_url: "https://{lang}.wikipedia.org/w/api.php".into(),
            user_agent: concat!("wiki-voice-bot/", env!("CARGO_PKG_VERSION")).into(),
            excerpt_min_length: 1000,
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// CacheConfig
// ---------------------------------------------------------------------------

/// Settings for the answer cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a cached answer in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 86_400 }
    }
}

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Settings for the lookup pipeline itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upper bound in seconds for every single step of a lookup (cache
    /// connect / get / set / close, article fetch, spell check).
    pub step_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step_timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// SpellerConfig
// ---------------------------------------------------------------------------

/// Settings for the Yandex Speller client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellerConfig {
    /// Base URL of the JSON service (the `/checkText` method is appended).
    pub base_url: String,
    /// Comma-separated dictionary languages.
    pub lang: String,
    /// Maximum seconds to wait for a response.
    pub timeout_secs: u64,
}

impl Default for SpellerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://speller.yandex.net/services/spellservice.json".into(),
            lang: "ru,en".into(),
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Yandex SpeechKit short-audio recogniser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Recognition endpoint.
    pub base_url: String,
    /// Recognition language tag, e.g. `"ru-RU"`.
    pub lang: String,
    /// Cloud folder id; required with IAM tokens, ignored with API keys.
    pub folder_id: Option<String>,
    /// Service-account API key (`Authorization: Api-Key …`).
    pub api_key: Option<String>,
    /// IAM token (`Authorization: Bearer …`), used when no API key is set.
    pub iam_token: Option<String>,
    /// Voice messages this long or longer are rejected before recognition.
    pub max_voice_secs: u32,
    /// Maximum seconds to wait for a response.
    pub timeout_secs: u64,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            base_url: "https://stt.api.cloud.yandex.net/speech/v1/stt:recognize".into(),
            lang: "ru-RU".into(),
            folder_id: None,
            api_key: None,
            iam_token: None,
            max_voice_secs: 15,
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the chat-completion backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API.
    ///
    /// - OpenAI: `https://api.openai.com`
    /// - Ollama: `http://localhost:11434`
    pub base_url: String,
    /// API key — `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a completion.
    pub timeout_secs: u64,
    /// Keep at most this many turns of history per session; `None` keeps
    /// the whole conversation until `/exit`.
    pub max_history_turns: Option<usize>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-3.5-turbo".into(),
            temperature: 1.0,
            timeout_secs: 60,
            max_history_turns: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use wiki_voice_bot::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert_eq!(config.cache.ttl_secs, 86_400);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Encyclopedia settings.
    pub wiki: WikiConfig,
    /// Answer cache settings.
    pub cache: CacheConfig,
    /// Lookup pipeline settings.
    pub pipeline: PipelineConfig,
    /// Spell checker settings.
    pub speller: SpellerConfig,
    /// Speech recogniser settings.
    pub stt: SttConfig,
    /// Chat backend settings.
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
