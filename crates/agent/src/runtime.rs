use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use supportbot_core::config::ToolChoice;
use supportbot_core::domain::order::{OrderBook, OrderId};
use supportbot_core::event_log::EventSink;
use tracing::debug;

use crate::faq::FaqMatcher;
use crate::guardrails::{GuardrailDecision, GuardrailFilter};
use crate::settings::ModelSettings;
use crate::tools::{
    extract_order_id, OrderStatusReport, OrderStatusTool, Tool, ToolError, ToolErrorPayload,
    ToolRegistry, ORDER_STATUS_TOOL,
};

pub const ORDER_ID_PROMPT: &str =
    "Could you please provide your order ID (format like A100) so I can check the status?";

/// Used when a failing tool has no handler and its error renders empty.
pub const FALLBACK_TOOL_ERROR: &str = "Order error";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffReason {
    ToolRequiredButDisabled,
    NegativeSentiment,
    UnknownOrComplex,
}

impl HandoffReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToolRequiredButDisabled => "tool_required_but_disabled",
            Self::NegativeSentiment => "negative_sentiment",
            Self::UnknownOrComplex => "unknown_or_complex",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ToolRequiredButDisabled => {
                "I need to fetch order details but couldn't. Handing off to human agent."
            }
            Self::NegativeSentiment => {
                "I can see you're upset. I'll transfer you to a human agent for support."
            }
            Self::UnknownOrComplex => "I'm not sure about that. I'll hand you over to a human agent.",
        }
    }

    /// Event type written to the log when the router escalates for this reason.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::NegativeSentiment => "escalation",
            Self::ToolRequiredButDisabled | Self::UnknownOrComplex => "escalation_reason",
        }
    }
}

impl fmt::Display for HandoffReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single result of routing one utterance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Handled { message: String, guardrail: bool, tool_error: bool },
    Handoff { reason: HandoffReason, message: String },
}

impl Outcome {
    pub fn handled(message: impl Into<String>) -> Self {
        Self::Handled { message: message.into(), guardrail: false, tool_error: false }
    }

    pub fn handoff(reason: HandoffReason) -> Self {
        Self::Handoff { reason, message: reason.user_message().to_string() }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Handled { message, .. } | Self::Handoff { message, .. } => message,
        }
    }

    pub fn handoff_reason(&self) -> Option<HandoffReason> {
        match self {
            Self::Handoff { reason, .. } => Some(*reason),
            Self::Handled { .. } => None,
        }
    }

    pub fn is_handoff(&self) -> bool {
        matches!(self, Self::Handoff { .. })
    }
}

/// Deterministic routing policy for the support bot.
///
/// Rules run in a fixed order and the first that applies ends the call:
/// guardrail, FAQ, order tool, escalation. Every call writes exactly one
/// terminal event to the sink.
pub struct AgentRuntime {
    name: String,
    guardrails: GuardrailFilter,
    faqs: FaqMatcher,
    tools: ToolRegistry,
    sink: Arc<dyn EventSink>,
}

impl AgentRuntime {
    pub const DEFAULT_NAME: &'static str = "BotAgent";

    pub fn new(
        guardrails: GuardrailFilter,
        faqs: FaqMatcher,
        tools: ToolRegistry,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self { name: Self::DEFAULT_NAME.to_string(), guardrails, faqs, tools, sink }
    }

    /// Default vocabulary plus the order-status tool backed by `orders`.
    pub fn with_order_book(orders: OrderBook, sink: Arc<dyn EventSink>) -> Self {
        let mut tools = ToolRegistry::default();
        tools.register(OrderStatusTool::new(orders, Arc::clone(&sink)));
        Self::new(GuardrailFilter::default(), FaqMatcher::default(), tools, sink)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self, utterance: &str, settings: &ModelSettings) -> Outcome {
        if let GuardrailDecision::Block { reason_code, user_message } = self.guardrails.gate(utterance)
        {
            return self.conclude(
                "guardrail_triggered",
                json!({ "reason": reason_code, "input": utterance }),
                Outcome::Handled { message: user_message, guardrail: true, tool_error: false },
            );
        }

        self.route(utterance, settings)
    }

    fn route(&self, utterance: &str, settings: &ModelSettings) -> Outcome {
        if let Some(entry) = self.faqs.find(utterance) {
            return self.conclude(
                "faq_answered",
                json!({ "faq": entry.question, "user_input": utterance }),
                Outcome::handled(entry.answer.clone()),
            );
        }

        let order_tool = self.tools.get(ORDER_STATUS_TOOL);
        let eligible = order_tool.is_some_and(|tool| tool.is_enabled(utterance));

        if settings.tool_choice == ToolChoice::Required && !eligible {
            return self.escalate(HandoffReason::ToolRequiredButDisabled, utterance);
        }

        if let Some(tool) = order_tool.filter(|_| eligible && settings.tool_choice.allows_tools()) {
            return match extract_order_id(utterance) {
                Some(order_id) => self.lookup_order(tool, utterance, &order_id, settings),
                None if self.guardrails.evaluate(utterance).negative => {
                    self.escalate(HandoffReason::NegativeSentiment, utterance)
                }
                None => self.conclude(
                    "order_id_requested",
                    json!({ "tool": tool.name(), "user_input": utterance }),
                    Outcome::handled(ORDER_ID_PROMPT),
                ),
            };
        }

        if self.guardrails.evaluate(utterance).negative {
            return self.escalate(HandoffReason::NegativeSentiment, utterance);
        }
        self.escalate(HandoffReason::UnknownOrComplex, utterance)
    }

    fn lookup_order(
        &self,
        tool: &dyn Tool,
        utterance: &str,
        order_id: &OrderId,
        settings: &ModelSettings,
    ) -> Outcome {
        let input = json!({ "user_input": utterance, "order_id": order_id });
        let result = tool.execute(input.clone()).and_then(|value| {
            serde_json::from_value::<OrderStatusReport>(value)
                .map_err(|error| ToolError::InvalidOutput(error.to_string()))
        });

        match result {
            Ok(report) => {
                let message = order_status_message(&report, settings);
                self.conclude(
                    "tool_success",
                    json!({ "tool": tool.name(), "order_id": order_id }),
                    Outcome::handled(message),
                )
            }
            Err(error) => {
                let payload = tool.error_payload(&input).unwrap_or_else(|| {
                    let text = error.to_string();
                    if text.trim().is_empty() {
                        ToolErrorPayload::new(FALLBACK_TOOL_ERROR)
                    } else {
                        ToolErrorPayload::new(text)
                    }
                });
                let outcome = Outcome::Handled {
                    message: payload.message.clone(),
                    guardrail: false,
                    tool_error: true,
                };
                self.conclude(
                    "tool_error",
                    json!({ "tool": tool.name(), "order_id": order_id, "error": payload }),
                    outcome,
                )
            }
        }
    }

    fn escalate(&self, reason: HandoffReason, utterance: &str) -> Outcome {
        self.conclude(
            reason.event_type(),
            json!({ "reason": reason, "input": utterance }),
            Outcome::handoff(reason),
        )
    }

    fn conclude(&self, event_type: &str, payload: Value, outcome: Outcome) -> Outcome {
        self.sink.log_event(event_type, payload);
        debug!(
            event_name = "agent.route.concluded",
            agent = %self.name,
            event_type = %event_type,
            handoff = outcome.is_handoff(),
            "routing decision reached"
        );
        outcome
    }
}

fn order_status_message(report: &OrderStatusReport, settings: &ModelSettings) -> String {
    let mut message = format!(
        "Order {} is currently '{}'. ETA: {}. Items: {}.",
        report.order_id,
        report.status,
        report.eta,
        report.items.join(", ")
    );
    if settings.customer_id() == Some(report.customer_id.as_str()) {
        message.push_str(" (Verified customer)");
    }
    message
}
