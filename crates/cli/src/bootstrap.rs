use std::path::PathBuf;
use std::sync::Arc;

use supportbot_agent::{ModelSettings, SupportSession};
use supportbot_core::config::{AppConfig, LoadOptions};
use supportbot_core::errors::ApplicationError;
use supportbot_core::event_log::{EventSink, JsonlEventSink};
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub session: SupportSession,
}

/// Options used by the binary: `.env` in the working directory plus the
/// usual file and environment layers.
pub fn default_load_options() -> LoadOptions {
    LoadOptions { dotenv_path: Some(PathBuf::from(".env")), ..LoadOptions::default() }
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, ApplicationError> {
    let config = AppConfig::load(options)?;
    init_logging(&config);

    let event_log = JsonlEventSink::open(&config.event_log.path)?;
    info!(
        event_name = "system.bootstrap.event_log_opened",
        correlation_id = "bootstrap",
        path = %event_log.path().display(),
        "event log opened for append"
    );

    let sink: Arc<dyn EventSink> = Arc::new(event_log);
    let settings = ModelSettings::from_session(&config.session);
    let session = SupportSession::with_defaults(settings, sink);
    info!(
        event_name = "system.bootstrap.session_ready",
        correlation_id = %session.correlation_id(),
        mode = %config.session.mode,
        tool_choice = %config.session.tool_choice,
        "support session ready"
    );

    Ok(Application { config, session })
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use supportbot_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::WARN);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    // Ignored when a subscriber is already installed (repeated runs in one process).
    let _ = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
}
