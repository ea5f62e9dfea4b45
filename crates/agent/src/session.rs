use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use supportbot_core::domain::order::OrderBook;
use supportbot_core::event_log::EventSink;
use tracing::info;
use uuid::Uuid;

use crate::handoff::{HandoffContext, HumanAgent};
use crate::runtime::{AgentRuntime, Outcome};
use crate::settings::ModelSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Bot,
    HumanAgent,
}

/// What the user sees for one turn, plus the bot's own decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub speaker: Speaker,
    pub message: String,
    pub bot_outcome: Outcome,
}

/// One conversation: the bot, its human fallback and the settings fixed at
/// session start. Turns are independent; nothing carries over between them.
pub struct SupportSession {
    runtime: AgentRuntime,
    human: HumanAgent,
    settings: ModelSettings,
    sink: Arc<dyn EventSink>,
    correlation_id: String,
}

impl SupportSession {
    pub fn new(
        runtime: AgentRuntime,
        human: HumanAgent,
        settings: ModelSettings,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self { runtime, human, settings, sink, correlation_id: Uuid::new_v4().to_string() }
    }

    /// Seeded order book, default vocabulary.
    pub fn with_defaults(settings: ModelSettings, sink: Arc<dyn EventSink>) -> Self {
        let runtime = AgentRuntime::with_order_book(OrderBook::seeded(), Arc::clone(&sink));
        let human = HumanAgent::new(Arc::clone(&sink));
        Self::new(runtime, human, settings, sink)
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn respond(&self, input: &str) -> Reply {
        let outcome = self.runtime.handle(input, &self.settings);

        let Some(reason) = outcome.handoff_reason() else {
            info!(
                event_name = "agent.session.bot_replied",
                correlation_id = %self.correlation_id,
                "bot handled turn"
            );
            return Reply {
                speaker: Speaker::Bot,
                message: outcome.message().to_string(),
                bot_outcome: outcome,
            };
        };

        let context = HandoffContext::new(input, Some(reason), self.settings.metadata.clone());
        self.sink.log_event(
            "handoff_initiated",
            json!({ "from": self.runtime.name(), "to": self.human.name(), "context": context }),
        );
        info!(
            event_name = "agent.session.handoff_initiated",
            correlation_id = %self.correlation_id,
            reason = %reason,
            "turn handed off to human agent"
        );

        let human_outcome = self.human.handle(&context);
        Reply {
            speaker: Speaker::HumanAgent,
            message: human_outcome.message().to_string(),
            bot_outcome: outcome,
        }
    }
}
