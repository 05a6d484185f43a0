//! Clients for the storefront's external collaborators.
//!
//! # Services
//!
//! - `chat` - Budtender assistant (Gemini) with transcript and fallbacks
//! - `forms` - Newsletter and contact form submission

pub mod chat;
pub mod forms;
