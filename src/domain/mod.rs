//! Domain value objects and display formatting.
//!
//! This module contains the canonicalize/validate/format helpers used at the
//! presentation boundary (CPF, phone numbers, currency, calendar dates) and the
//! type-safe wrappers built on top of them. Every free function here is total:
//! malformed input yields `false` or is returned unchanged, never an error.

pub mod cpf;
pub mod dates;
pub mod email;
pub mod errors;
pub mod money;
pub mod phone;
pub mod reference_month;

pub use cpf::{format_cpf, is_valid_cpf, unformat_cpf, Cpf};
pub use dates::{
    calculate_age, calculate_age_from_iso, days_until_birthday, format_date, format_date_for_input,
    format_date_for_input_str, format_date_str, format_date_time, parse_date, today,
};
pub use email::{is_valid_email, EmailAddress};
pub use errors::ValidationError;
pub use money::{format_currency, parse_currency};
pub use phone::{format_phone, unformat_phone, PhoneNumber};
pub use reference_month::ReferenceMonth;

/// Strip every character that is not an ASCII decimal digit.
///
/// Idempotent: canonicalizing an already canonical string returns it unchanged.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}
