//! Budtender replies, fallbacks and the transcript over HTTP.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::http::StatusCode;
use cannabiabuds_integration_tests::{ScriptedAssistant, TestApp};
use cannabiabuds_storefront::services::chat::{
    ChatError, ChatRole, EMPTY_REPLY_FALLBACK, ERROR_FALLBACK, GREETING,
};
use serde_json::json;

#[tokio::test]
async fn transcript_starts_with_the_greeting() {
    let app = TestApp::offline();

    let (status, body) = app.get("/api/chat").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["awaiting_reply"], false);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "model");
    assert_eq!(messages[0]["text"], GREETING);
}

#[tokio::test]
async fn replies_are_recorded_and_history_excludes_the_greeting() {
    let assistant = Arc::new(ScriptedAssistant::new([
        Ok("Try Granddaddy Purple.".to_owned()),
        Ok("It tastes like grape.".to_owned()),
    ]));
    let app = TestApp::new(assistant.clone());

    let (status, body) = app.post("/api/chat", json!({ "message": "help me sleep" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Try Granddaddy Purple.");

    let (_, body) = app.post("/api/chat", json!({ "message": "  taste?  " })).await;
    assert_eq!(body["reply"], "It tastes like grape.");

    let histories = assistant.histories();
    assert_eq!(histories.len(), 2);
    assert!(histories[0].is_empty());
    assert_eq!(histories[1].len(), 2);
    assert_eq!(histories[1][0].role, ChatRole::User);
    assert_eq!(histories[1][1].role, ChatRole::Model);

    let (_, body) = app.get("/api/chat").await;
    let texts: Vec<&str> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(
        texts,
        [
            GREETING,
            "help me sleep",
            "Try Granddaddy Purple.",
            "taste?",
            "It tastes like grape.",
        ]
    );
}

#[tokio::test]
async fn failures_and_empty_answers_become_fallback_lines() {
    let assistant = Arc::new(ScriptedAssistant::new([
        Err(ChatError::Api {
            status: 503,
            message: "overloaded".to_owned(),
        }),
        Ok("   ".to_owned()),
    ]));
    let app = TestApp::new(assistant);

    let (status, body) = app.post("/api/chat", json!({ "message": "hello?" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], ERROR_FALLBACK);

    let (_, body) = app.post("/api/chat", json!({ "message": "anyone?" })).await;
    assert_eq!(body["reply"], EMPTY_REPLY_FALLBACK);

    // Script exhausted: the assistant now reports itself unconfigured.
    let (_, body) = app.post("/api/chat", json!({ "message": "still there?" })).await;
    assert_eq!(body["reply"], ERROR_FALLBACK);

    let (_, body) = app.get("/api/chat").await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 7);
    assert_eq!(body["awaiting_reply"], false);
}

#[tokio::test]
async fn blank_messages_are_rejected() {
    let app = TestApp::offline();

    let (status, body) = app.post("/api/chat", json!({ "message": " \n\t" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, body) = app.get("/api/chat").await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
}
