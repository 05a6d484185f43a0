//! CLI command implementations.
//!
//! Every command runs against a fresh, seeded [`Storefront`], the same
//! facade the HTTP server uses. Nothing is persisted between runs.
//!
//! [`Storefront`]: cannabiabuds_storefront::Storefront

pub mod cart;
pub mod catalog;
pub mod chat;
