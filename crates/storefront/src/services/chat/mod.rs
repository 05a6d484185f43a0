//! Budtender chat.
//!
//! [`ChatBridge`] keeps the conversation transcript and turns every
//! assistant failure into a friendly line, so callers always get a reply.
//! The assistant itself sits behind the [`Assistant`] trait.
//!
//! A new message supersedes any exchange still in flight. Each exchange gets
//! a ticket; when a reply comes back with a ticket that is no longer the
//! latest, it is still handed to its caller but left out of the transcript.

mod error;
mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub use error::ChatError;
pub use gemini::{BUDTENDER_SYSTEM_INSTRUCTION, GeminiClient};

/// First line of every conversation.
pub const GREETING: &str = "Hi! I'm Bud, your virtual budtender. Looking for something to help you sleep, or maybe sparkle up your creativity?";

/// Shown when the assistant answers with nothing.
pub const EMPTY_REPLY_FALLBACK: &str =
    "I'm having a little trouble connecting to the network right now. Try again in a moment, man.";

/// Shown when the assistant call fails.
pub const ERROR_FALLBACK: &str = "Sorry, I lost my train of thought. Can you ask that again?";

/// Who said a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Model,
}

/// One line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// A remote conversational assistant.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Answer `message` given the prior turns in `history`.
    ///
    /// An empty string is a valid (if unhelpful) answer.
    async fn reply(&self, history: &[ChatMessage], message: &str) -> Result<String, ChatError>;
}

/// Stand-in used when no assistant is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAssistant;

#[async_trait]
impl Assistant for OfflineAssistant {
    async fn reply(&self, _history: &[ChatMessage], _message: &str) -> Result<String, ChatError> {
        Err(ChatError::Unconfigured)
    }
}

/// Conversation state shared by concurrent exchanges.
#[derive(Debug)]
struct Conversation {
    transcript: Vec<ChatMessage>,
    /// Ticket of the most recent exchange.
    latest: u64,
    /// Whether the most recent exchange is still waiting on the assistant.
    awaiting: bool,
}

/// Transcript-keeping front for an [`Assistant`].
#[derive(Clone)]
pub struct ChatBridge {
    assistant: Arc<dyn Assistant>,
    conversation: Arc<Mutex<Conversation>>,
}

impl std::fmt::Debug for ChatBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatBridge").finish_non_exhaustive()
    }
}

impl ChatBridge {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self {
            assistant,
            conversation: Arc::new(Mutex::new(Conversation {
                transcript: vec![ChatMessage::model(GREETING)],
                latest: 0,
                awaiting: false,
            })),
        }
    }

    /// A bridge whose every answer is the error fallback.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineAssistant))
    }

    /// Send a shopper message and wait for the reply.
    ///
    /// Never fails: an empty or failed answer becomes a fallback line.
    /// Blank input is ignored and yields `None`.
    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn send_message(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let (ticket, history) = {
            let mut conversation = self.conversation.lock().await;
            // The greeting is presentation only; the assistant never sees it.
            let history = conversation.transcript.get(1..).unwrap_or_default().to_vec();
            conversation.transcript.push(ChatMessage::user(text));
            conversation.latest += 1;
            conversation.awaiting = true;
            (conversation.latest, history)
        };

        let reply = match self.assistant.reply(&history, text).await {
            Ok(reply) if reply.trim().is_empty() => {
                tracing::warn!("assistant returned an empty reply");
                EMPTY_REPLY_FALLBACK.to_owned()
            }
            Ok(reply) => reply,
            Err(ChatError::Unconfigured) => {
                tracing::debug!("no assistant configured");
                ERROR_FALLBACK.to_owned()
            }
            Err(e) => {
                tracing::warn!(error = %e, "assistant request failed");
                ERROR_FALLBACK.to_owned()
            }
        };

        let mut conversation = self.conversation.lock().await;
        if conversation.latest == ticket {
            conversation.transcript.push(ChatMessage::model(reply.clone()));
            conversation.awaiting = false;
        } else {
            tracing::debug!(ticket, latest = conversation.latest, "discarding superseded reply");
        }
        Some(reply)
    }

    /// The conversation so far, greeting first.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.conversation.lock().await.transcript.clone()
    }

    /// Whether the latest message is still waiting on a reply.
    pub async fn is_awaiting_reply(&self) -> bool {
        self.conversation.lock().await.awaiting
    }
}
