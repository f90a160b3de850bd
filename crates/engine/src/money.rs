//! Decimal amounts as shown to and typed by the user.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{EngineError, ResultEngine};

/// Formats `amount` with two decimals, `,` thousands separators and the
/// currency code: `-1,234.50 EUR`.
#[must_use]
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if currency.is_empty() {
        format!("{sign}{grouped}.{frac_part}")
    } else {
        format!("{sign}{grouped}.{frac_part} {currency}")
    }
}

/// Parses a positive amount typed in a form.
///
/// Accepts `.` or `,` as decimal separator; rejects more than two decimals,
/// signs and zero.
pub fn parse_amount(input: &str) -> ResultEngine<Decimal> {
    let invalid = || EngineError::Validation(format!("invalid amount: {input:?}"));

    let trimmed = input.trim().replace(',', ".");
    if trimmed.is_empty() {
        return Err(EngineError::Validation("empty amount".to_string()));
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }
    if let Some((_, frac)) = trimmed.split_once('.')
        && frac.len() > 2
    {
        return Err(EngineError::Validation("too many decimals".to_string()));
    }

    let amount = Decimal::from_str(&trimmed).map_err(|_| invalid())?;
    if amount.is_zero() {
        return Err(EngineError::Validation("amount must be > 0".to_string()));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_grouping_and_code() {
        assert_eq!(format_amount(Decimal::ZERO, "EUR"), "0.00 EUR");
        assert_eq!(format_amount(Decimal::new(5, 1), "EUR"), "0.50 EUR");
        assert_eq!(format_amount(Decimal::new(123450, 2), "USD"), "1,234.50 USD");
        assert_eq!(format_amount(Decimal::new(-100000000, 2), "EUR"), "-1,000,000.00 EUR");
        assert_eq!(format_amount(Decimal::new(999, 0), ""), "999.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_amount(Decimal::new(10005, 3), "EUR"), "10.01 EUR");
        assert_eq!(format_amount(Decimal::new(-4, 3), "EUR"), "0.00 EUR");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(parse_amount("10").unwrap(), Decimal::from(10));
        assert_eq!(parse_amount("10.5").unwrap(), Decimal::new(105, 1));
        assert_eq!(parse_amount(" 10,50 ").unwrap(), Decimal::new(1050, 2));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("12.345").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("1.2.3").is_err());
        assert!(parse_amount("abc").is_err());
    }
}
