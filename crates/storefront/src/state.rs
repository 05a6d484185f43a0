//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::StorefrontConfig;
use crate::services::chat::{Assistant, ChatBridge, ChatError, GeminiClient, OfflineAssistant};
use crate::services::forms::{FormClient, FormService};
use crate::shop::Storefront;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("assistant client: {0}")]
    Assistant(#[from] ChatError),
    #[error("form client: {0}")]
    Forms(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The storefront sits behind a
/// read/write lock; a write guard is held for the whole of each mutation
/// and never across a call to an external service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    shop: RwLock<Storefront>,
    chat: ChatBridge,
    forms: FormService,
}

impl AppState {
    /// Create a new application state with a seeded storefront.
    ///
    /// The assistant is Gemini when an API key is configured and the
    /// offline stand-in otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let assistant: Arc<dyn Assistant> = match &config.gemini {
            Some(gemini) => Arc::new(GeminiClient::new(gemini)?),
            None => {
                tracing::warn!("GEMINI_API_KEY not set, budtender chat will answer with its fallback");
                Arc::new(OfflineAssistant)
            }
        };
        Self::with_parts(config, Storefront::new(), assistant)
    }

    /// Create state from explicit parts. Used by tests to inject a scripted
    /// assistant or a custom catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the form client fails to build.
    pub fn with_parts(
        config: StorefrontConfig,
        shop: Storefront,
        assistant: Arc<dyn Assistant>,
    ) -> Result<Self, StateError> {
        let forms = FormService::new(FormClient::new(config.forms_endpoint.clone())?);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shop: RwLock::new(shop),
                chat: ChatBridge::new(assistant),
                forms,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Shared read access to catalog, cart and session.
    pub async fn shop(&self) -> RwLockReadGuard<'_, Storefront> {
        self.inner.shop.read().await
    }

    /// Exclusive access for a mutation.
    pub async fn shop_mut(&self) -> RwLockWriteGuard<'_, Storefront> {
        self.inner.shop.write().await
    }

    #[must_use]
    pub fn chat(&self) -> &ChatBridge {
        &self.inner.chat
    }

    #[must_use]
    pub fn forms(&self) -> &FormService {
        &self.inner.forms
    }
}
