//! # Glosa Common Library
//!
//! Shared code for the Glosa services including:
//! - Error and result types
//! - Configuration loading (root folder, TOML)
//! - Event types (GlosaEvent enum) and the EventBus
//! - SSE stream helpers
//! - Storage timestamp helpers

pub mod config;
pub mod error;
pub mod events;
pub mod sse;
pub mod time;

pub use error::{Error, Result};
