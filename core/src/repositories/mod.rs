//! Repository interfaces for persistence, with in-memory test doubles.

pub mod otp;

pub use otp::{InMemoryOtpRepository, OtpRepository};
