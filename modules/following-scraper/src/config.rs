use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use instagram_client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const DEFAULT_MAX_FOLLOWING: usize = 10_000;

/// Root data directory, controlled by `DATA_DIR` env var (default: `"data"`).
pub fn data_dir() -> PathBuf {
    PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Both,
}

impl OutputFormat {
    pub fn writes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    pub fn writes_csv(self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::Both)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Both => "both",
        };
        f.write_str(s)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "both" => Ok(OutputFormat::Both),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Raw settings as read from `settings.json`.
///
/// A missing or unparseable file is an empty mapping. Each accessor applies
/// its own default, so one badly typed key never discards the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    values: Map<String, Value>,
}

impl Settings {
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Settings file not readable, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(values)) => Self { values },
            Ok(_) => {
                error!(path = %path.display(), "Settings file must contain a JSON object, using defaults");
                Self::default()
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to decode settings JSON, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    pub fn base_url(&self) -> String {
        match self.get("base_url") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            None => DEFAULT_BASE_URL.to_string(),
            Some(other) => {
                warn!(value = %other, "Invalid base_url in settings, using default");
                DEFAULT_BASE_URL.to_string()
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        match self.get("request_timeout") {
            None => DEFAULT_TIMEOUT,
            Some(value) => match value
                .as_f64()
                .filter(|secs| *secs > 0.0)
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            {
                Some(timeout) => timeout,
                None => {
                    warn!(value = %value, "Invalid request_timeout in settings, using default");
                    DEFAULT_TIMEOUT
                }
            },
        }
    }

    pub fn max_following_per_user(&self) -> usize {
        match self.get("max_following_per_user") {
            None => DEFAULT_MAX_FOLLOWING,
            Some(value) => match value.as_u64().and_then(|n| usize::try_from(n).ok()) {
                Some(n) => n,
                None => {
                    warn!(value = %value, "Invalid max_following_per_user in settings, using default");
                    DEFAULT_MAX_FOLLOWING
                }
            },
        }
    }

    pub fn user_agent(&self) -> Option<String> {
        match self.get("user_agent")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            other => {
                warn!(value = %other, "Invalid user_agent in settings, using default");
                None
            }
        }
    }

    pub fn default_output_format(&self) -> OutputFormat {
        match self.get("default_output_format") {
            None => OutputFormat::default(),
            Some(value) => match value.as_str().map(OutputFormat::from_str) {
                Some(Ok(format)) => format,
                _ => {
                    warn!(value = %value, "Invalid default_output_format in settings, using json");
                    OutputFormat::default()
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// ScraperConfig
// ---------------------------------------------------------------------------

/// Effective configuration for one run: settings with CLI overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ScraperConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub max_following: usize,
    pub user_agent: Option<String>,
    pub output_format: OutputFormat,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl ScraperConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            base_url: settings.base_url(),
            request_timeout: settings.request_timeout(),
            max_following: settings.max_following_per_user(),
            user_agent: settings.user_agent(),
            output_format: settings.default_output_format(),
        }
    }

    /// Command-line values win over the settings file.
    pub fn with_overrides(
        mut self,
        max_following: Option<usize>,
        output_format: Option<OutputFormat>,
    ) -> Self {
        if let Some(n) = max_following {
            self.max_following = n;
        }
        if let Some(format) = output_format {
            self.output_format = format;
        }
        self
    }

    pub fn log_summary(&self) {
        info!(
            base_url = self.base_url.as_str(),
            timeout_secs = self.request_timeout.as_secs_f64(),
            max_following = self.max_following,
            custom_user_agent = self.user_agent.is_some(),
            output_format = %self.output_format,
            "Scraper config loaded"
        );
    }
}
