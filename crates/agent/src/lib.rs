//! Support bot agent - deterministic intent routing and tool dispatch
//!
//! This crate is the decision layer of the support bot:
//! - Screens each utterance for offensive or negative language (`guardrails`)
//! - Answers canned questions (`faq`)
//! - Looks up orders through named, eligibility-gated tools (`tools`)
//! - Escalates anything else to a human (`handoff`)
//!
//! # Architecture
//!
//! `AgentRuntime::handle` runs the rules in a fixed order and returns exactly
//! one `Outcome` per call:
//! 1. **Guardrail** - offensive input gets a rephrase prompt
//! 2. **FAQ** - first matching question wins
//! 3. **Order tool** - eligibility, id extraction, lookup
//! 4. **Escalation** - `Handoff` with a reason code
//!
//! `SupportSession` wraps one conversation and forwards handoffs to the
//! `HumanAgent`.
//!
//! There is no language model in the loop. Matching is substring and regex
//! only, so the same input and settings always produce the same outcome.

pub mod faq;
pub mod guardrails;
pub mod handoff;
pub mod runtime;
pub mod session;
pub mod settings;
pub mod tools;

pub use runtime::{AgentRuntime, HandoffReason, Outcome};
pub use session::{Reply, Speaker, SupportSession};
pub use settings::ModelSettings;
