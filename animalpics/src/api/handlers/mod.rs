//! HTTP request handlers.
//!
//! - [`animal_pictures`]: saving picture batches and reading the latest picture
//! - [`static_assets`]: embedded UI serving
//!
//! Handlers return [`crate::errors::Error`], which converts to a status code and a user-safe
//! message.

pub mod animal_pictures;
pub mod static_assets;
