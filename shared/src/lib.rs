//! Shared utilities and common types for the SignupDesk server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Response structures
//! - Utility functions (identifier validation, etc.)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, RateLimitConfig, ServerConfig,
};
pub use types::{ApiResponse, ErrorResponse};
pub use utils::validation;
