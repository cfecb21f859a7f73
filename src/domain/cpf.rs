//! CPF (Cadastro de Pessoas Físicas) validation and formatting.
//!
//! A CPF is 11 decimal digits where the last two are check digits computed
//! from the preceding ones with a weighted modulo-11 sum. Input may carry any
//! punctuation; it is canonicalized to digits before any rule is applied.

use super::digits_only;
use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const CPF_LENGTH: usize = 11;

/// Check whether `input` is a valid CPF.
///
/// Total over every string: wrong length, repeated digits (`000.000.000-00`,
/// `111.111.111-11`, ...) and checksum mismatches all return `false`.
///
/// # Example
///
/// ```
/// use ecclesia_mcp_server::domain::is_valid_cpf;
///
/// assert!(is_valid_cpf("111.444.777-35"));
/// assert!(!is_valid_cpf("111.444.777-36"));
/// ```
pub fn is_valid_cpf(input: &str) -> bool {
    let digits: Vec<u32> = digits_only(input)
        .bytes()
        .map(|b| u32::from(b - b'0'))
        .collect();

    if digits.len() != CPF_LENGTH {
        return false;
    }

    // Repeated digits satisfy the checksum but are not issued
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Compute the check digit for the given prefix (9 digits for the first, 10 for the second).
///
/// Weights run from `prefix.len() + 1` down to 2.
fn check_digit(prefix: &[u32]) -> u32 {
    let top = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();

    match (sum * 10) % 11 {
        10 | 11 => 0,
        rem => rem,
    }
}

/// Render a CPF as `XXX.XXX.XXX-XX`.
///
/// Only the length is checked, not the checksum. Input that does not
/// canonicalize to exactly 11 digits is returned unchanged.
pub fn format_cpf(input: &str) -> String {
    let digits = digits_only(input);
    if digits.len() != CPF_LENGTH {
        return input.to_string();
    }
    group_cpf(&digits)
}

/// Remove the display formatting from a CPF, returning digits only.
pub fn unformat_cpf(input: &str) -> String {
    digits_only(input)
}

fn group_cpf(digits: &str) -> String {
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

/// A type-safe wrapper for a validated CPF.
///
/// Holds the canonical 11-digit form; `Display` renders the grouped form.
///
/// # Example
///
/// ```
/// use ecclesia_mcp_server::domain::Cpf;
///
/// let cpf = Cpf::new("111.444.777-35").unwrap();
/// assert_eq!(cpf.as_str(), "11144477735");
/// assert_eq!(cpf.to_string(), "111.444.777-35");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl Cpf {
    /// Create a new Cpf from raw or formatted input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidCpf` if the input is not a valid CPF.
    pub fn new(cpf: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = cpf.as_ref();
        if !is_valid_cpf(raw) {
            return Err(ValidationError::InvalidCpf(raw.to_string()));
        }
        Ok(Self(digits_only(raw)))
    }

    /// Get the canonical digits as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the canonical digit string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

// Serde support - serialize as canonical digits
impl Serialize for Cpf {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

// Serde support - deserialize from string with validation
impl<'de> Deserialize<'de> for Cpf {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cpf::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&group_cpf(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_valid_cpf() {
        assert!(is_valid_cpf("11144477735"));
        assert!(is_valid_cpf("111.444.777-35"));
        assert!(is_valid_cpf(" 111 444 777 35 "));
        assert!(is_valid_cpf("529.982.247-25"));
    }

    #[test]
    fn test_altered_check_digits_are_invalid() {
        assert!(!is_valid_cpf("11144477736"));
        assert!(!is_valid_cpf("11144477725"));
        assert!(!is_valid_cpf("529.982.247-26"));
    }

    #[test]
    fn test_wrong_length_is_invalid() {
        assert!(!is_valid_cpf(""));
        assert!(!is_valid_cpf("123"));
        assert!(!is_valid_cpf("111444777351"));
        assert!(!is_valid_cpf("not a cpf"));
    }

    #[test]
    fn test_repeated_digits_are_invalid() {
        for d in 0..=9 {
            let cpf = d.to_string().repeat(11);
            assert!(!is_valid_cpf(&cpf), "{} should be rejected", cpf);
        }
    }

    #[test]
    fn test_check_digit_reduction() {
        // 11144477735: first sum 162 -> 1620 % 11 = 3, second sum 204 -> 2040 % 11 = 5
        assert_eq!(check_digit(&[1, 1, 1, 4, 4, 4, 7, 7, 7]), 3);
        assert_eq!(check_digit(&[1, 1, 1, 4, 4, 4, 7, 7, 7, 3]), 5);
        // Sum 12 -> 120 % 11 = 10, which collapses to 0
        assert_eq!(check_digit(&[0, 0, 0, 0, 0, 0, 0, 0, 6]), 0);
    }

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_cpf("11144477735"), "111.444.777-35");
        // Checksum is not required for display
        assert_eq!(format_cpf("12345678900"), "123.456.789-00");
        assert_eq!(format_cpf("111.444.777-35"), "111.444.777-35");
    }

    #[test]
    fn test_format_cpf_falls_back_to_input() {
        assert_eq!(format_cpf("123"), "123");
        assert_eq!(format_cpf(""), "");
        assert_eq!(format_cpf("12-34"), "12-34");
    }

    #[test]
    fn test_unformat_cpf() {
        assert_eq!(unformat_cpf("111.444.777-35"), "11144477735");
        assert_eq!(unformat_cpf("123"), "123");
    }

    #[test]
    fn test_cpf_value_object() {
        let cpf = Cpf::new("111.444.777-35").unwrap();
        assert_eq!(cpf.as_str(), "11144477735");
        assert_eq!(format!("{}", cpf), "111.444.777-35");
        assert_eq!(
            Cpf::new("111.111.111-11"),
            Err(ValidationError::InvalidCpf("111.111.111-11".to_string()))
        );
    }

    #[test]
    fn test_cpf_serde() {
        let cpf = Cpf::new("11144477735").unwrap();
        assert_eq!(serde_json::to_string(&cpf).unwrap(), "\"11144477735\"");

        let parsed: Cpf = serde_json::from_str("\"111.444.777-35\"").unwrap();
        assert_eq!(parsed, cpf);

        let result: Result<Cpf, _> = serde_json::from_str("\"11144477736\"");
        assert!(result.is_err());
    }
}
