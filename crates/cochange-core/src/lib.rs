//! Core types, configuration, and error handling for cochange.
//!
//! This crate provides the shared foundation used by the other crates:
//! - [`CochangeError`] — unified error type using `thiserror`
//! - [`CochangeConfig`] — configuration loaded from `.cochange.toml`
//! - Shared types: [`ReportStyle`], [`LabelMatch`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{CochangeConfig, HistoryConfig, OutputConfig, ParserConfig};
pub use error::CochangeError;
pub use types::{LabelMatch, OutputFormat, ReportStyle};

/// A convenience `Result` type for cochange operations.
pub type Result<T> = std::result::Result<T, CochangeError>;
