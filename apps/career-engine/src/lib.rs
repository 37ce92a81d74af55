//! Career discovery dialogue engine.
//!
//! Turns a user's free-text answers into a structured, quantified career
//! profile over a phase-gated conversation. The core (`engine`) is pure and
//! synchronous; `service` wraps it with a session store, per-session turn
//! serialisation, and optional augmentation of the follow-up wording.

pub mod augment;
pub mod config;
pub mod dialogue;
pub mod engine;
pub mod errors;
pub mod extraction;
pub mod models;
pub mod scoring;
pub mod service;
pub mod store;
pub mod synthesis;
pub mod text;

pub use config::{Config, EngineConfig};
pub use engine::{Engine, MessageContext, TurnOutcome};
pub use errors::EngineError;
pub use service::{ConversationService, TurnReply};
pub use synthesis::Summary;
