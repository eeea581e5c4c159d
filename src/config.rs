/// Service configuration
///
/// Loaded from a TOML file (default `worksafe.toml`). Every section and key is
/// optional; anything left out takes the value shown in `Default`. A `.env`
/// file is honoured, and two environment variables override the file so the
/// read key never has to be committed:
///
///   THINGSPEAK_API_KEY     → feed.api_key
///   THINGSPEAK_CHANNEL_ID  → feed.channel_id
///
/// Example:
///
/// ```toml
/// [feed]
/// channel_id = "2936641"
/// results = 1
///
/// [poll]
/// interval_secs = 5
///
/// [bands]
/// humidity_normal_max = 80.0
/// humidity_warning_max = 85.0
/// ```

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::ingest::thingspeak::{self, THINGSPEAK_BASE_URL};
use crate::logging::LogLevel;
use crate::model::Bands;

pub const DEFAULT_CONFIG_PATH: &str = "worksafe.toml";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub channel_id: String,
    pub api_key: Option<String>,
    /// Entries requested per poll; only the newest is used.
    pub results: u32,
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            base_url: THINGSPEAK_BASE_URL.to_string(),
            channel_id: "2936641".to_string(),
            api_key: None,
            results: 1,
            timeout_secs: 10,
        }
    }
}

impl FeedConfig {
    pub fn url(&self) -> String {
        thingspeak::build_feed_url(&self.base_url, &self.channel_id, self.api_key.as_deref(), self.results)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_secs: u64,
    /// Stop after this many polls; 0 runs until killed.
    pub max_polls: u64,
    /// Readings older than this are flagged stale; 0 disables the check.
    pub stale_after_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval_secs: 5,
            max_polls: 0,
            stale_after_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig { capacity: 50 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of "debug", "info", "warn", "error".
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Unrecognised names fall back to Info.
    pub fn min_level(&self) -> LogLevel {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "warn" | "warning" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Where the last good reading is kept between runs. None disables it.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// A saved `feeds.json` document. When set, the monitor replays it
    /// instead of polling the live channel.
    pub path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub poll: PollConfig,
    pub history: HistoryConfig,
    pub bands: Bands,
    pub logging: LoggingConfig,
    pub cache: CacheConfig,
    pub replay: ReplayConfig,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The file exists but could not be read.
    Io(String),
    /// The file is not valid TOML or has wrongly typed keys.
    Parse(String),
    /// Values that parse but cannot work together.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, or returns defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// `load` followed by `.env` and environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut config = Self::load(path)?;
        config.apply_overrides(
            std::env::var("THINGSPEAK_API_KEY").ok(),
            std::env::var("THINGSPEAK_CHANNEL_ID").ok(),
        );
        Ok(config)
    }

    pub fn apply_overrides(&mut self, api_key: Option<String>, channel_id: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.feed.api_key = Some(key);
        }
        if let Some(id) = channel_id.filter(|c| !c.trim().is_empty()) {
            self.feed.channel_id = id;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll.interval_secs == 0 {
            return Err(ConfigError::Invalid("poll.interval_secs must be at least 1".into()));
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid("history.capacity must be at least 1".into()));
        }
        if self.feed.results == 0 {
            return Err(ConfigError::Invalid("feed.results must be at least 1".into()));
        }
        let b = &self.bands;
        let float_bands = [
            ("humidity_normal_max", b.humidity_normal_max),
            ("humidity_warning_max", b.humidity_warning_max),
            ("temp_warning_margin", b.temp_warning_margin),
            ("heat_index_offset", b.heat_index_offset),
        ];
        if let Some((name, _)) = float_bands.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("bands.{} must be a finite number", name)));
        }
        if b.humidity_normal_max > b.humidity_warning_max {
            return Err(ConfigError::Invalid(
                "bands.humidity_normal_max must not exceed humidity_warning_max".into(),
            ));
        }
        if b.crowd_normal_min < b.crowd_warning_min {
            return Err(ConfigError::Invalid(
                "bands.crowd_normal_min must not be below crowd_warning_min".into(),
            ));
        }
        if b.temp_warning_margin < 0.0 || b.gas_warning_margin < 0 {
            return Err(ConfigError::Invalid("bands warning margins must not be negative".into()));
        }
        Ok(())
    }
}
