//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided CPF fails the length, repeated-digit or checksum rules.
    InvalidCpf(String),

    /// The provided email address is invalid.
    InvalidEmail(String),

    /// The provided phone number is not a 10 or 11 digit Brazilian number.
    InvalidPhone(String),

    /// The provided reference month is not `YYYY-MM`.
    InvalidReferenceMonth(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCpf(cpf) => write!(f, "Invalid CPF: {}", cpf),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
            Self::InvalidPhone(phone) => write!(f, "Invalid phone number: {}", phone),
            Self::InvalidReferenceMonth(month) => {
                write!(f, "Invalid reference month (expected YYYY-MM): {}", month)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
