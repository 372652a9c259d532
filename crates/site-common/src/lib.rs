//! # site-common
//!
//! Shared configuration, error types and URL helpers for the downloads site.

pub mod config;
pub mod error;
pub mod url;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
