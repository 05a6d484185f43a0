//! End-to-end tests for the Cannabiabuds storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cannabiabuds-integration-tests
//! ```
//!
//! Every test drives the real [`Router`] in-process through
//! [`tower::ServiceExt::oneshot`]. The budtender is a scripted
//! [`Assistant`], so nothing here touches the network.
//!
//! # Test Categories
//!
//! - `admin_gate` - Catalog administration behind the session gate
//! - `cart_totals` - Cart quantities, snapshots and totals
//! - `chat_fallback` - Budtender replies, fallbacks and transcript

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use cannabiabuds_storefront::Storefront;
use cannabiabuds_storefront::config::StorefrontConfig;
use cannabiabuds_storefront::routes;
use cannabiabuds_storefront::services::chat::{Assistant, ChatError, ChatMessage};
use cannabiabuds_storefront::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// An assistant that plays back canned answers in order.
///
/// Once the script runs out every further call fails with
/// [`ChatError::Unconfigured`]. Each call's history is recorded.
#[derive(Debug, Default)]
pub struct ScriptedAssistant {
    answers: Mutex<VecDeque<Result<String, ChatError>>>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedAssistant {
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = Result<String, ChatError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            seen: Mutex::default(),
        }
    }

    /// Histories passed to each call so far.
    #[must_use]
    pub fn histories(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().expect("history lock poisoned").clone()
    }
}

#[async_trait]
impl Assistant for ScriptedAssistant {
    async fn reply(&self, history: &[ChatMessage], _message: &str) -> Result<String, ChatError> {
        self.seen
            .lock()
            .expect("history lock poisoned")
            .push(history.to_vec());
        self.answers
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or(Err(ChatError::Unconfigured))
    }
}

/// A storefront application under test.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Seeded storefront with default configuration and the given assistant.
    #[must_use]
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        let state = AppState::with_parts(StorefrontConfig::default(), Storefront::new(), assistant)
            .expect("failed to build test state");
        Self {
            router: routes::app(state),
        }
    }

    /// Seeded storefront whose assistant has nothing to say.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(Arc::new(ScriptedAssistant::default()))
    }

    /// Send one request and decode the JSON body (`Null` when empty).
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::POST, uri, None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, None).await
    }

    pub async fn login(&self) {
        let (status, _) = self.post_empty("/api/session/login").await;
        assert_eq!(status, StatusCode::OK);
    }

    pub async fn logout(&self) {
        let (status, _) = self.post_empty("/api/session/logout").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
