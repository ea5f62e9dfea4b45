use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use supportbot_core::domain::order::{OrderBook, OrderId, OrderStatus};
use supportbot_core::event_log::EventSink;
use thiserror::Error;

pub const ORDER_STATUS_TOOL: &str = "get_order_status";

/// One upper-case ASCII letter followed by two or more decimal digits, on word
/// boundaries. Digits are Unicode-aware, so `A١٢٣` is a candidate id.
pub fn order_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b[A-Z]\d{2,}\b").expect("valid regex"))
}

/// First order id in the original-case text.
pub fn extract_order_id(text: &str) -> Option<OrderId> {
    order_id_pattern().find(text).map(|found| OrderId::new(found.as_str()))
}

/// Gate deciding whether a tool may be considered for an utterance.
#[derive(Clone)]
pub enum EligibilityRule {
    Always,
    /// Case-insensitive substring test.
    Keyword(String),
    /// Case-sensitive regex test on the raw text.
    Pattern(Regex),
    Any(Vec<EligibilityRule>),
    Custom(fn(&str) -> bool),
}

impl EligibilityRule {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self::Keyword(keyword.into().to_lowercase())
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Always => true,
            Self::Keyword(keyword) => text.to_lowercase().contains(keyword.as_str()),
            Self::Pattern(pattern) => pattern.is_match(text),
            Self::Any(rules) => rules.iter().any(|rule| rule.matches(text)),
            Self::Custom(predicate) => predicate(text),
        }
    }
}

impl fmt::Debug for EligibilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::Keyword(keyword) => f.debug_tuple("Keyword").field(keyword).finish(),
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(&pattern.as_str()).finish(),
            Self::Any(rules) => f.debug_tuple("Any").field(rules).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("Order {order_id} not found.")]
    NotFound { order_id: String },
    #[error("invalid tool input: {0}")]
    InvalidInput(String),
    #[error("invalid tool output: {0}")]
    InvalidOutput(String),
    /// Tool-specific failure, rendered verbatim.
    #[error("{0}")]
    Failed(String),
}

/// User-facing error produced by a tool's error handler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolErrorPayload {
    pub error: bool,
    pub message: String,
}

impl ToolErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: true, message: message.into() }
    }
}

pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn eligibility(&self) -> &EligibilityRule;

    fn execute(&self, input: Value) -> Result<Value, ToolError>;

    /// Formats a failed call for the user. Invoked by the caller, not by `execute`.
    fn error_payload(&self, _input: &Value) -> Option<ToolErrorPayload> {
        None
    }

    fn is_enabled(&self, text: &str) -> bool {
        self.eligibility().matches(text)
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| &**tool)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLookupRequest {
    pub user_input: String,
    pub order_id: OrderId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusReport {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub eta: String,
    pub items: Vec<String>,
    pub customer_id: String,
}

/// Resolves an order id against the read-only order book.
pub struct OrderStatusTool {
    orders: OrderBook,
    eligibility: EligibilityRule,
    sink: Arc<dyn EventSink>,
}

impl OrderStatusTool {
    pub fn new(orders: OrderBook, sink: Arc<dyn EventSink>) -> Self {
        let eligibility = EligibilityRule::Any(vec![
            EligibilityRule::keyword("order"),
            EligibilityRule::Pattern(order_id_pattern().clone()),
        ]);
        Self { orders, eligibility, sink }
    }

    pub fn lookup(&self, request: &OrderLookupRequest) -> Result<OrderStatusReport, ToolError> {
        self.sink.log_event(
            "tool_invoked",
            json!({
                "tool": ORDER_STATUS_TOOL,
                "order_id": request.order_id,
                "user_input": request.user_input,
            }),
        );

        let record = self
            .orders
            .get(request.order_id.as_str())
            .ok_or_else(|| ToolError::NotFound { order_id: request.order_id.to_string() })?;

        Ok(OrderStatusReport {
            order_id: request.order_id.clone(),
            status: record.status,
            eta: record.eta.clone(),
            items: record.items.clone(),
            customer_id: record.customer_id.clone(),
        })
    }

    pub fn not_found(order_id: &str) -> ToolErrorPayload {
        ToolErrorPayload::new(format!(
            "Order ID '{order_id}' not found. Please check the ID or contact support."
        ))
    }
}

impl Tool for OrderStatusTool {
    fn name(&self) -> &'static str {
        ORDER_STATUS_TOOL
    }

    fn eligibility(&self) -> &EligibilityRule {
        &self.eligibility
    }

    fn execute(&self, input: Value) -> Result<Value, ToolError> {
        let request: OrderLookupRequest = serde_json::from_value(input)
            .map_err(|error| ToolError::InvalidInput(error.to_string()))?;
        let report = self.lookup(&request)?;
        serde_json::to_value(report).map_err(|error| ToolError::InvalidOutput(error.to_string()))
    }

    fn error_payload(&self, input: &Value) -> Option<ToolErrorPayload> {
        input.get("order_id").and_then(Value::as_str).map(Self::not_found)
    }
}
