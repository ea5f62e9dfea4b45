use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use supportbot_core::event_log::EventSink;

use crate::runtime::{HandoffReason, Outcome};

/// Everything a human operator receives when the bot gives up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffContext {
    pub user_input: String,
    pub reason: Option<HandoffReason>,
    pub metadata: BTreeMap<String, String>,
}

impl HandoffContext {
    pub fn new(
        user_input: impl Into<String>,
        reason: Option<HandoffReason>,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        Self { user_input: user_input.into(), reason, metadata }
    }
}

/// Terminal fallback. Formats the context into a reply; the transport is
/// responsible for reaching an actual operator.
pub struct HumanAgent {
    name: String,
    sink: Arc<dyn EventSink>,
}

impl HumanAgent {
    pub const DEFAULT_NAME: &'static str = "HumanAgent";

    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { name: Self::DEFAULT_NAME.to_string(), sink }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self, context: &HandoffContext) -> Outcome {
        self.sink.log_event("human_agent_received", json!({ "context": context }));

        let reason = context.reason.map(|reason| reason.as_str()).unwrap_or("unspecified");
        Outcome::handled(format!(
            "[Human Agent] Hello — I've received your request about: '{}'. Reason: {reason}. We'll assist you shortly.",
            context.user_input
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use supportbot_core::event_log::InMemoryEventSink;

    use super::{HandoffContext, HumanAgent};
    use crate::runtime::{HandoffReason, Outcome};

    #[test]
    fn reply_embeds_input_and_reason() {
        let sink = InMemoryEventSink::default();
        let agent = HumanAgent::new(Arc::new(sink.clone()));

        let outcome = agent.handle(&HandoffContext::new(
            "tell me a joke",
            Some(HandoffReason::UnknownOrComplex),
            BTreeMap::new(),
        ));

        assert_eq!(
            outcome,
            Outcome::handled(
                "[Human Agent] Hello — I've received your request about: 'tell me a joke'. Reason: unknown_or_complex. We'll assist you shortly."
            )
        );
        assert_eq!(sink.event_types(), vec!["human_agent_received"]);
        assert_eq!(sink.entries()[0].payload["context"]["user_input"], "tell me a joke");
    }

    #[test]
    fn missing_reason_is_reported_as_unspecified() {
        let agent = HumanAgent::new(Arc::new(InMemoryEventSink::default()));
        let outcome = agent.handle(&HandoffContext::new("help", None, BTreeMap::new()));

        assert!(outcome.message().contains("Reason: unspecified."));
        assert!(!outcome.is_handoff());
    }
}
