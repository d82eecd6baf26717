//! Shared utilities, configuration, and error handling for Chatdesk
//!
//! This crate provides common functionality used across the Chatdesk
//! application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Database pool bootstrap and migrations

pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use db::{Database, RepositoryError};
pub use error::{Error, Result};
