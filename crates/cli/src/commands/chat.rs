//! One-shot budtender chat.
//!
//! # Usage
//!
//! ```bash
//! cbud chat "what's good for sleep?"
//! ```
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY` - Gemini API key. Without it Bud answers with the
//!   fallback line.
//! - `GEMINI_MODEL` - Model name (default `gemini-2.5-flash`)

use std::sync::Arc;

use cannabiabuds_storefront::config::{ConfigError, StorefrontConfig};
use cannabiabuds_storefront::services::chat::{
    Assistant, ChatBridge, ChatError, GREETING, GeminiClient, OfflineAssistant,
};
use thiserror::Error;

/// Errors that can occur before the message is sent.
#[derive(Debug, Error)]
pub enum ChatCommandError {
    /// The environment holds an invalid setting.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The Gemini client could not be built.
    #[error(transparent)]
    Client(#[from] ChatError),

    /// Nothing to send.
    #[error("Message must not be blank")]
    BlankMessage,
}

/// Pick Gemini when configured, the offline stand-in otherwise.
fn assistant(config: &StorefrontConfig) -> Result<Arc<dyn Assistant>, ChatError> {
    Ok(match &config.gemini {
        Some(gemini) => Arc::new(GeminiClient::new(gemini)?),
        None => {
            tracing::warn!("GEMINI_API_KEY not set, Bud will answer with the fallback line");
            Arc::new(OfflineAssistant)
        }
    })
}

/// Send `message` and print Bud's reply.
pub async fn ask(message: &str) -> Result<(), ChatCommandError> {
    let config = StorefrontConfig::from_env()?;
    let bridge = ChatBridge::new(assistant(&config)?);

    tracing::info!("Bud: {GREETING}");
    tracing::info!("You: {}", message.trim());

    let reply = bridge
        .send_message(message)
        .await
        .ok_or(ChatCommandError::BlankMessage)?;

    tracing::info!("Bud: {reply}");
    Ok(())
}
