//! pio CLI Library
//!
//! This library provides the core functionality of the `pio` command-line
//! client for put.io.
//!
//! # Public API
//!
//! The primary public API is the [`client::PutioClient`] which provides
//! programmatic access to the put.io REST API. Configuration types are also
//! available via [`config::CliConfig`] and [`config::ConfigBuilder`].
//!
//! ```no_run
//! use pio::client::{walk_files, PutioClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PutioClient::with_config("https://api.put.io/v2", "my-token", 30)?;
//!
//! for line in walk_files(&client, 0).await? {
//!     println!("{}{}", "  ".repeat(line.depth), line.name);
//! }
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for communicating with the put.io API.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

#[cfg(test)]
pub mod test_utils;
