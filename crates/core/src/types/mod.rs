//! Core types for Cannabiabuds.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{ProductId, ProductIdGenerator, UserId};
pub use price::{Price, PriceError};
pub use status::{ProductCategory, Role, StrainType, UnknownVariant};
