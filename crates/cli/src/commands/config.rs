use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use supportbot_core::config::{resolve_config_path, AppConfig, LoadOptions};
use supportbot_core::errors::ApplicationError;
use toml::Value;

use crate::bootstrap::default_load_options;
use crate::commands::CommandResult;

struct Field {
    key: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> CommandResult {
    run_with(default_load_options())
}

pub fn run_with(options: LoadOptions) -> CommandResult {
    let config_path = resolve_config_path(options.config_path.as_deref());
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", &ApplicationError::from(error)),
    };
    let config_doc = load_config_doc(config_path.as_deref());

    let api_key = match &config.gemini.api_key {
        Some(key) => redact_key(key.expose_secret()),
        None => "<unset>".to_string(),
    };
    let fields = [
        Field { key: "session.mode", env_keys: &["MODE"], value: config.session.mode.clone() },
        Field {
            key: "session.customer_id",
            env_keys: &["CUSTOMER_ID"],
            value: config.session.customer_id.clone().unwrap_or_else(|| "<unset>".to_string()),
        },
        Field {
            key: "session.tool_choice",
            env_keys: &["SUPPORTBOT_TOOL_CHOICE"],
            value: config.session.tool_choice.to_string(),
        },
        Field { key: "gemini.api_key", env_keys: &["GEMINI_API_KEY"], value: api_key },
        Field {
            key: "event_log.path",
            env_keys: &["SUPPORTBOT_EVENT_LOG_PATH"],
            value: config.event_log.path.display().to_string(),
        },
        Field {
            key: "logging.level",
            env_keys: &["SUPPORTBOT_LOGGING_LEVEL", "SUPPORTBOT_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key: "logging.format",
            env_keys: &["SUPPORTBOT_LOGGING_FORMAT", "SUPPORTBOT_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format).to_lowercase(),
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields.iter().map(|field| {
        let source = field_source(field, config_doc.as_ref(), config_path.as_deref());
        format!("- {} = {} (source: {source})", field.key, field.value)
    }));
    CommandResult::output(lines.join("\n"))
}

fn load_config_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(field: &Field, config_doc: Option<&Value>, config_path: Option<&Path>) -> String {
    if let Some(env_key) = field.env_keys.iter().find(|key| env_is_set(key)) {
        return format!("env ({env_key})");
    }

    if config_doc.is_some_and(|doc| contains_path(doc, field.key)) {
        let file = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("config file"));
        return format!("file ({})", file.display());
    }

    "default".to_string()
}

/// Blank values are ignored by the config loader, so they do not count as a source.
fn env_is_set(key: &str) -> bool {
    env::var(key).is_ok_and(|value| !value.trim().is_empty())
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    key_path.split('.').try_fold(root, |current, key| current.get(key)).is_some()
}

/// Keeps the last four characters of long keys so operators can tell keys apart.
fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    let char_count = trimmed.chars().count();
    if char_count <= 8 {
        return "<redacted>".to_string();
    }

    let tail: String = trimmed.chars().skip(char_count - 4).collect();
    format!("<redacted>...{tail}")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, redact_key};

    #[test]
    fn short_keys_are_fully_redacted() {
        assert_eq!(redact_key("abc"), "<redacted>");
        assert_eq!(redact_key("AIzaSyExample1234"), "<redacted>...1234");
    }

    #[test]
    fn dotted_paths_are_resolved_in_toml() {
        let doc: Value = "[session]\nmode = \"online\"\n".parse().expect("valid toml");
        assert!(contains_path(&doc, "session.mode"));
        assert!(!contains_path(&doc, "session.customer_id"));
        assert!(!contains_path(&doc, "logging.level"));
    }
}
