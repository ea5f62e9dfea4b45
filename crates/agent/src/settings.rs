use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use supportbot_core::config::{SessionConfig, ToolChoice};

pub const CUSTOMER_ID_KEY: &str = "customer_id";

/// Per-session routing knobs. Built once when the session starts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub tool_choice: ToolChoice,
    pub metadata: BTreeMap<String, String>,
}

impl ModelSettings {
    pub fn new(tool_choice: ToolChoice) -> Self {
        Self { tool_choice, metadata: BTreeMap::new() }
    }

    pub fn from_session(session: &SessionConfig) -> Self {
        let settings = Self::new(session.tool_choice);
        match session.customer_id.as_deref() {
            Some(customer_id) => settings.with_customer_id(customer_id),
            None => settings,
        }
    }

    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.metadata.insert(CUSTOMER_ID_KEY.to_string(), customer_id.into());
        self
    }

    /// The verifying customer id, if one was supplied and is non-empty.
    pub fn customer_id(&self) -> Option<&str> {
        self.metadata.get(CUSTOMER_ID_KEY).map(String::as_str).filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use supportbot_core::config::{AppConfig, ToolChoice};

    use super::ModelSettings;

    #[test]
    fn empty_customer_id_is_treated_as_absent() {
        let settings = ModelSettings::default().with_customer_id("");
        assert_eq!(settings.customer_id(), None);
        assert_eq!(settings.tool_choice, ToolChoice::Auto);
    }

    #[test]
    fn session_config_seeds_metadata() {
        let mut config = AppConfig::default();
        config.session.customer_id = Some("12345".to_string());
        config.session.tool_choice = ToolChoice::Required;

        let settings = ModelSettings::from_session(&config.session);
        assert_eq!(settings.customer_id(), Some("12345"));
        assert_eq!(settings.tool_choice, ToolChoice::Required);
    }

    #[test]
    fn session_without_customer_has_no_metadata() {
        let settings = ModelSettings::from_session(&AppConfig::default().session);
        assert!(settings.metadata.is_empty());
    }
}
