pub mod config;
pub mod domain;
pub mod errors;
pub mod event_log;

pub use config::{AppConfig, ConfigError, LoadOptions, ToolChoice};
pub use domain::order::{OrderBook, OrderId, OrderRecord, OrderStatus};
pub use errors::ApplicationError;
pub use event_log::{EventSink, InMemoryEventSink, JsonlEventSink, LogEntry};
