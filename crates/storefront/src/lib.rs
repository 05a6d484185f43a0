//! Cannabiabuds storefront library.
//!
//! The commerce state engine (catalog, filtering, cart, session gate) plus
//! the thin JSON API and external collaborators built around it. The binary
//! in `main.rs` only wires configuration, logging and the listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod session;
pub mod shop;
pub mod state;

pub use shop::{CatalogAdmin, Storefront};
