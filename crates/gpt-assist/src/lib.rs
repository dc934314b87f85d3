//! `gpt-assist` — client for the LLM text service behind the kikaku
//! brainstorming steps.
//!
//! Two operations, both thin request/response contracts over an
//! OpenAI-compatible `/chat/completions` endpoint:
//!
//! - [`AssistClient::associate_word`] — given a word, a genre, and a list of
//!   already-used words, returns exactly one associated word (mind-map step).
//! - [`AssistClient::generate_concepts`] — given the collected keywords,
//!   returns exactly three short concept strings (concept step).
//!
//! The client never retries and never blocks navigation: callers surface
//! failures and keep going.

pub mod client;
pub mod error;
pub mod types;

pub use client::{AssistClient, ClientOptions};
pub use error::AssistError;
pub use types::{ChatCompletion, ChatMessage, ChatRequest, ResponseFormat};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, AssistError>;
