//! Brazilian real (BRL) display formatting.
//!
//! Amounts are `rust_decimal::Decimal` so values coming from the API
//! (`"150.00"`) never pass through binary floating point. Display rounding is
//! round-half-to-even (banker's rounding) to two fraction digits.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const CURRENCY_PREFIX: &str = "R$";
const FRACTION_DIGITS: u32 = 2;

/// Format an amount as BRL: `R$ 1.234,50`.
///
/// Negative amounts render as `-R$ 1.234,50`. An amount that rounds to zero is
/// never shown with a sign.
///
/// # Example
///
/// ```
/// use ecclesia_mcp_server::domain::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.5)), "R$ 1.234,50");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded =
        amount.round_dp_with_strategy(FRACTION_DIGITS, RoundingStrategy::MidpointNearestEven);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    rounded.set_sign_positive(true);
    rounded.rescale(FRACTION_DIGITS);

    let plain = rounded.to_string();
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!(
        "{}{} {},{}",
        if negative { "-" } else { "" },
        CURRENCY_PREFIX,
        group_thousands(integer),
        fraction
    )
}

/// Parse a user-entered amount.
///
/// Accepts the display form (`R$ 1.234,50`, `1.234,50`, `12,5`), thousands
/// grouping without cents (`R$ 1.500`, `1.234.567`) and the canonical form
/// (`1234.50`). Without a comma, a lone `.` followed by exactly three digits is
/// a thousands separator. Returns `None` when the text is not a number.
pub fn parse_currency(input: &str) -> Option<Decimal> {
    let cleaned: String = input
        .trim()
        .trim_start_matches(CURRENCY_PREFIX)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let canonical = match cleaned.split_once(',') {
        Some((integer, fraction)) => format!("{}.{}", ungroup(integer)?, fraction),
        None if is_grouped(&cleaned) => ungroup(&cleaned)?,
        None => cleaned,
    };

    Decimal::from_str(&canonical).ok()
}

/// `1.500` or `1.234.567`: every group after the first has three digits and
/// the first has no leading zero.
fn is_grouped(integer: &str) -> bool {
    let mut groups = integer.split('.');
    let first = groups.next().unwrap_or("");
    let rest: Vec<&str> = groups.collect();
    !rest.is_empty()
        && (rest.len() > 1 || rest[0].len() == 3)
        && !first.trim_start_matches('-').is_empty()
        && !first.trim_start_matches('-').starts_with('0')
}

/// Drop thousands dots, rejecting misplaced ones (`1.23.456`).
fn ungroup(integer: &str) -> Option<String> {
    let mut groups = integer.split('.');
    let first = groups.next()?;
    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
