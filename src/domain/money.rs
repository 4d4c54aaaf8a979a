use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as a dollar string with two decimals and thousands separators.
/// Example: 12.34 -> "$12.34", 1234.5 -> "$1,234.50", -3 -> "-$3.00"
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (units, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{}${}.{}", sign, group_thousands(units), fraction)
}

/// Format a fractional rate as a percentage with two decimals.
/// Example: 0.08 -> "8.00%", 0.0725 -> "7.25%"
pub fn format_percentage(rate: Decimal) -> String {
    let percent = rate
        .saturating_mul(Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    format!("{:.2}%", percent)
}

fn group_thousands(units: &str) -> String {
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Parse a decimal amount, tolerating a leading `$` and `,` group separators.
/// Example: "50" -> 50, "$1,234.50" -> 1234.50, ".5" -> 0.5, "-3" -> -3
pub fn parse_amount(input: &str) -> Result<Decimal, ParseAmountError> {
    let input = input.trim();
    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let body = body.strip_prefix('$').unwrap_or(body).replace(',', "");

    let value = parse_unsigned(&body)?;
    Ok(if negative { -value } else { value })
}

/// Parse a tax rate given either as a fraction ("0.08") or a percentage ("8%").
pub fn parse_rate(input: &str) -> Result<Decimal, ParseAmountError> {
    let input = input.trim();
    match input.strip_suffix('%') {
        Some(percent) => Ok(parse_unsigned(percent.trim())? / Decimal::ONE_HUNDRED),
        None => parse_unsigned(input),
    }
}

fn parse_unsigned(body: &str) -> Result<Decimal, ParseAmountError> {
    let well_formed = body.chars().any(|c| c.is_ascii_digit())
        && body.chars().all(|c| c.is_ascii_digit() || c == '.')
        && body.matches('.').count() <= 1;
    if !well_formed {
        return Err(ParseAmountError::InvalidFormat);
    }

    // ".5" is accepted as shorthand for "0.5"
    let normalized = if body.starts_with('.') {
        format!("0{}", body)
    } else {
        body.to_string()
    };
    let normalized = normalized.trim_end_matches('.');

    Decimal::from_str(normalized).map_err(|_| ParseAmountError::OutOfRange)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    OutOfRange,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
            ParseAmountError::OutOfRange => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(12.34)), "$12.34");
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(5)), "$5.00");
        assert_eq!(format_currency(dec!(999.999)), "$1,000.00");
        assert_eq!(format_currency(dec!(1234.5)), "$1,234.50");
        assert_eq!(format_currency(dec!(1234567.89)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(-3)), "-$3.00");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(dec!(0.08)), "8.00%");
        assert_eq!(format_percentage(dec!(0.0725)), "7.25%");
        assert_eq!(format_percentage(dec!(0)), "0.00%");
        assert_eq!(format_percentage(dec!(1)), "100.00%");
        assert_eq!(
            format_percentage(Decimal::MAX),
            format!("{:.2}%", Decimal::MAX)
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50"), Ok(dec!(50)));
        assert_eq!(parse_amount("12.34"), Ok(dec!(12.34)));
        assert_eq!(parse_amount(".5"), Ok(dec!(0.5)));
        assert_eq!(parse_amount("$1,234.50"), Ok(dec!(1234.50)));
        assert_eq!(parse_amount("-3"), Ok(dec!(-3)));
        assert_eq!(parse_amount(" 7. "), Ok(dec!(7)));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert_eq!(parse_amount("abc"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount("12.34.56"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount(""), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount("$"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount("--3"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount("-$-3"), Err(ParseAmountError::InvalidFormat));
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("0.08"), Ok(dec!(0.08)));
        assert_eq!(parse_rate("8%"), Ok(dec!(0.08)));
        assert_eq!(parse_rate("7.25 %"), Ok(dec!(0.0725)));
        assert!(parse_rate("eight").is_err());
        assert!(parse_rate("-0.08").is_err());
    }
}
