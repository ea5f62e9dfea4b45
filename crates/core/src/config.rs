use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MODE: &str = "offline";
pub const DEFAULT_EVENT_LOG_PATH: &str = "logs/tool_logs.txt";
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["supportbot.toml", "config/supportbot.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub gemini: GeminiConfig,
    pub event_log: EventLogConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub mode: String,
    pub customer_id: Option<String>,
    pub tool_choice: ToolChoice,
}

/// Carried for a future model-backed mode; the router never reads it.
#[derive(Clone, Debug, Default)]
pub struct GeminiConfig {
    pub api_key: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct EventLogConfig {
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    #[default]
    Auto,
    Required,
    None,
}

impl ToolChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Required => "required",
            Self::None => "none",
        }
    }

    /// Whether the router may call a tool at all under this choice.
    pub fn allows_tools(&self) -> bool {
        matches!(self, Self::Auto | Self::Required)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub mode: Option<String>,
    pub customer_id: Option<String>,
    pub tool_choice: Option<ToolChoice>,
    pub event_log_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    /// `.env` file whose entries fill in variables that are not already set.
    pub dotenv_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("could not load dotenv file `{path}`: {source}")]
    Dotenv { path: PathBuf, source: dotenvy::Error },
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig {
                mode: DEFAULT_MODE.to_string(),
                customer_id: None,
                tool_choice: ToolChoice::Auto,
            },
            gemini: GeminiConfig::default(),
            event_log: EventLogConfig { path: PathBuf::from(DEFAULT_EVENT_LOG_PATH) },
            logging: LoggingConfig { level: "warn".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for ToolChoice {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "required" => Ok(Self::Required),
            "none" => Ok(Self::None),
            other => Err(ConfigError::Validation(format!(
                "unsupported tool choice `{other}` (expected auto|required|none)"
            ))),
        }
    }
}

impl std::fmt::Display for ToolChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        if let Some(dotenv_path) = options.dotenv_path.as_deref() {
            load_dotenv(dotenv_path)?;
        }

        let mut config = Self::default();
        if let Some(path) = resolve_config_path(options.config_path.as_deref()) {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(session) = patch.session {
            if let Some(mode) = session.mode {
                self.session.mode = normalize_mode(&mode);
            }
            if let Some(customer_id) = session.customer_id {
                self.session.customer_id = normalize_customer_id(&customer_id);
            }
            if let Some(tool_choice) = session.tool_choice {
                self.session.tool_choice = tool_choice;
            }
        }

        if let Some(gemini) = patch.gemini {
            if let Some(api_key) = gemini.api_key {
                self.gemini.api_key = secret_value(api_key);
            }
        }

        if let Some(event_log) = patch.event_log {
            if let Some(path) = event_log.path {
                self.event_log.path = path;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("GEMINI_API_KEY") {
            self.gemini.api_key = secret_value(value);
        }
        if let Some(value) = read_env("MODE") {
            self.session.mode = normalize_mode(&value);
        }
        if let Some(value) = read_env("CUSTOMER_ID") {
            self.session.customer_id = normalize_customer_id(&value);
        }
        if let Some(value) = read_env("SUPPORTBOT_TOOL_CHOICE") {
            self.session.tool_choice = value.parse().map_err(|_| {
                ConfigError::InvalidEnvOverride {
                    key: "SUPPORTBOT_TOOL_CHOICE".to_string(),
                    value: value.clone(),
                }
            })?;
        }
        if let Some(value) = read_env("SUPPORTBOT_EVENT_LOG_PATH") {
            self.event_log.path = PathBuf::from(value);
        }

        let log_level =
            read_env("SUPPORTBOT_LOGGING_LEVEL").or_else(|| read_env("SUPPORTBOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SUPPORTBOT_LOGGING_FORMAT").or_else(|| read_env("SUPPORTBOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(mode) = overrides.mode {
            self.session.mode = normalize_mode(&mode);
        }
        if let Some(customer_id) = overrides.customer_id {
            self.session.customer_id = normalize_customer_id(&customer_id);
        }
        if let Some(tool_choice) = overrides.tool_choice {
            self.session.tool_choice = tool_choice;
        }
        if let Some(event_log_path) = overrides.event_log_path {
            self.event_log.path = event_log_path;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_session(&self.session)?;
        validate_event_log(&self.event_log)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn load_dotenv(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Ok(());
    }

    dotenvy::from_path(path)
        .map_err(|source| ConfigError::Dotenv { path: path.to_path_buf(), source })
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_session(session: &SessionConfig) -> Result<(), ConfigError> {
    if session.mode.is_empty() {
        return Err(ConfigError::Validation("session.mode must not be empty".to_string()));
    }

    Ok(())
}

fn validate_event_log(event_log: &EventLogConfig) -> Result<(), ConfigError> {
    if event_log.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("event_log.path must not be empty".to_string()));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn normalize_mode(value: &str) -> String {
    value.trim().to_lowercase()
}

fn normalize_customer_id(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn secret_value(value: String) -> Option<SecretString> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| SecretString::from(trimmed.to_string()))
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    session: Option<SessionPatch>,
    gemini: Option<GeminiPatch>,
    event_log: Option<EventLogPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionPatch {
    mode: Option<String>,
    customer_id: Option<String>,
    tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiPatch {
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EventLogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
