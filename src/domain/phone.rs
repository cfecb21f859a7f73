//! Brazilian phone number formatting and the PhoneNumber value object.

use super::digits_only;
use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const MOBILE_LENGTH: usize = 11;
const LANDLINE_LENGTH: usize = 10;

/// Render a phone number for display.
///
/// 11 digits (mobile) become `(XX) XXXXX-XXXX`, 10 digits (landline) become
/// `(XX) XXXX-XXXX`. Anything else is returned unchanged.
pub fn format_phone(input: &str) -> String {
    let digits = digits_only(input);
    match digits.len() {
        MOBILE_LENGTH => format!("({}) {}-{}", &digits[0..2], &digits[2..7], &digits[7..11]),
        LANDLINE_LENGTH => format!("({}) {}-{}", &digits[0..2], &digits[2..6], &digits[6..10]),
        _ => input.to_string(),
    }
}

/// Remove the display formatting from a phone number, returning digits only.
///
/// No length validation is applied.
pub fn unformat_phone(input: &str) -> String {
    digits_only(input)
}

/// A type-safe wrapper for Brazilian phone numbers.
///
/// Stores the canonical digits (area code + number, 10 or 11 digits).
///
/// # Example
///
/// ```
/// use ecclesia_mcp_server::domain::PhoneNumber;
///
/// let phone = PhoneNumber::new("(11) 98765-4321").unwrap();
/// assert_eq!(phone.as_str(), "11987654321");
/// assert!(phone.is_mobile());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a new PhoneNumber from raw or formatted input.
    ///
    /// # Validation Rules
    ///
    /// - Can contain: digits, spaces, hyphens, parentheses, plus sign, periods
    /// - Must canonicalize to 10 or 11 digits
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPhone` if the phone format is invalid.
    pub fn new(phone: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = phone.as_ref();

        if !Self::is_valid(raw) {
            return Err(ValidationError::InvalidPhone(raw.to_string()));
        }

        Ok(Self(digits_only(raw)))
    }

    /// Validate phone format.
    fn is_valid(phone: &str) -> bool {
        let allowed = phone.chars().all(|c| {
            c.is_ascii_digit()
                || c == ' '
                || c == '-'
                || c == '('
                || c == ')'
                || c == '+'
                || c == '.'
        });

        allowed && matches!(digits_only(phone).len(), LANDLINE_LENGTH | MOBILE_LENGTH)
    }

    /// Get the canonical digits as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the canonical digit string.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Two-digit area code (DDD).
    pub fn area_code(&self) -> &str {
        &self.0[..2]
    }

    /// Whether this is an 11-digit mobile number.
    pub fn is_mobile(&self) -> bool {
        self.0.len() == MOBILE_LENGTH
    }
}

// Serde support - serialize as canonical digits
impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

// Serde support - deserialize from string with validation
impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PhoneNumber::new(s).map_err(serde::de::Error::custom)
    }
}

// Display support - grouped form
impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_phone(&self.0))
    }
}
