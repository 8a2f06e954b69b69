//! # SignupDesk Core
//!
//! Core business logic and domain layer for the SignupDesk backend.
//! This crate contains the OTP record entity, the issuer/verifier services,
//! repository and collaborator interfaces, the client OTP widget state
//! machine, and the error types shared by the outer layers.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod widget;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
