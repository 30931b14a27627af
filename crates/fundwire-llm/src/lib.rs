//! Fundwire LLM Provider Layer
//!
//! Implementations of the `ChatProvider` trait from `fundwire-domain`.
//!
//! # Providers
//!
//! - `ChatClient`: OpenAI-compatible chat-completions endpoint (local or remote)
//! - `MockChat`: deterministic scripted mock for testing
//!
//! # Examples
//!
//! ```
//! use fundwire_llm::MockChat;
//! use fundwire_domain::{ChatMessage, ChatProvider};
//!
//! # async fn example() {
//! let provider = MockChat::new(r#"{"Montant": "5M€"}"#);
//! let reply = provider.complete(&[ChatMessage::user("article")]).await.unwrap();
//! assert_eq!(reply, r#"{"Montant": "5M€"}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use async_trait::async_trait;
use fundwire_domain::{ChatMessage, ChatProvider};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openai::{ChatClient, LlmConfig};

/// Errors that can occur while talking to an LLM endpoint.
///
/// All variants are transport-level failures from the pipeline's point of
/// view; a reply that parses as a chat completion but contains no JSON is
/// not an `LlmError`.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or HTTP error reaching the endpoint
    #[error("communication error: {0}")]
    Communication(String),

    /// The endpoint answered with something that is not a chat completion
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Scripted mock provider for deterministic testing.
///
/// Replies are served from a queue, one per `complete` call; once the queue
/// is drained, the default reply repeats. The mock records how many messages
/// each call carried, which lets tests assert on conversation growth across
/// repair attempts.
#[derive(Debug, Clone)]
pub struct MockChat {
    default_reply: String,
    scripted: Arc<Mutex<VecDeque<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<usize>>>,
}

impl MockChat {
    /// Create a mock that always returns the same reply.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            default_reply: reply.into(),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a reply for the next unscripted call.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.scripted.lock().unwrap().push_back(Ok(reply.into()));
    }

    /// Queue a communication error for the next unscripted call.
    pub fn push_error(&self, message: impl Into<String>) {
        self.scripted.lock().unwrap().push_back(Err(message.into()));
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Message count of each call, in order.
    pub fn message_counts(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockChat {
    fn default() -> Self {
        Self::new("{}")
    }
}

#[async_trait]
impl ChatProvider for MockChat {
    type Error = LlmError;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(messages.len());

        let next = self.scripted.lock().unwrap().pop_front();
        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(LlmError::Communication(message)),
            None => Ok(self.default_reply.clone()),
        }
    }
}
