//! Identifier validation utilities
//!
//! An identifier is the email address or phone number an OTP is bound to.
//! Phone numbers are plain 10-digit strings; email comparison is
//! case-insensitive, so emails are lower-cased before storage and lookup.

use once_cell::sync::Lazy;
use regex::Regex;

// Pragmatic email pattern; full RFC 5322 validation is not attempted
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").unwrap());

/// Check if an email address is valid
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Check if a phone number is a valid 10-digit string
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Normalize an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check if a submitted OTP code has the expected 6-digit shape
pub fn is_valid_otp_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

/// Mask an identifier for logging (show only a short suffix)
pub fn mask_identifier(identifier: &str) -> String {
    if identifier.len() <= 4 {
        "****".to_string()
    } else {
        format!("***{}", &identifier[identifier.len() - 4..])
    }
}
