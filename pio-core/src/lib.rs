//! pio Core Library
//!
//! Shared types, response access and formatting helpers for the put.io CLI.
//! Nothing in this crate performs I/O; the `pio` crate owns the HTTP client
//! and the terminal output.

pub mod api;
pub mod document;
pub mod error;
pub mod models;
pub mod units;

// Re-export commonly used types
pub use document::Document;
pub use error::*;
pub use models::*;
pub use units::{format_ratio, human_bytes, human_speed};
