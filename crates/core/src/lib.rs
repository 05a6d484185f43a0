//! Cannabiabuds Core - Shared types library.
//!
//! This crate provides common types used across all Cannabiabuds components:
//! - `storefront` - Commerce state engine and its JSON surface
//! - `cli` - Command-line tools for browsing the catalog and quoting carts
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no shared
//! state. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and catalog enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
