//! # AgriSmart Common Library
//!
//! Shared code for the AgriSmart services including:
//! - Bootstrap configuration loading (TOML, environment, CLI overrides)
//! - Common error type
//! - Tracing initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
