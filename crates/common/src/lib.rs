//! Shared utilities, configuration, and error handling for DevConnect
//!
//! This crate provides common functionality used across the job board API:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Store-assigned document identifiers
//! - A JSON body extractor with uniform 400 rejections

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod id;

pub use config::{ApplicationUniqueness, Config, LogFormat, StoreBackend, DEFAULT_LOG_FILTER};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::JsonBody;
pub use id::DocumentId;
