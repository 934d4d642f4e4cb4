//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T, separator: &str) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;
    for c in s.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format a monetary amount for report output.
///
/// Rounds half away from zero to `decimal_places`, groups the integer part
/// with `separator`, and wraps negative amounts in parentheses:
/// `-1234.5` becomes `(1,234.50)`.
pub fn format_amount(amount: Decimal, decimal_places: u32, separator: &str) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", decimal_places as usize, rounded);

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut formatted = format_number(int_part, separator);
    if let Some(frac) = frac_part {
        formatted.push('.');
        formatted.push_str(frac);
    }

    if amount.is_sign_negative() && !rounded.is_zero() {
        format!("({})", formatted)
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567, ","), "1,234,567");
        assert_eq!(format_number(123, ","), "123");
        assert_eq!(format_number(1000, " "), "1 000");
    }

    #[test]
    fn test_format_amount_positive() {
        assert_eq!(format_amount(Decimal::new(123456, 1), 2, ","), "12,345.60");
        assert_eq!(format_amount(Decimal::ZERO, 2, ","), "0.00");
    }

    #[test]
    fn test_format_amount_negative_is_parenthesized() {
        assert_eq!(format_amount(Decimal::new(-12345, 1), 2, ","), "(1,234.50)");
    }

    #[test]
    fn test_format_amount_rounding() {
        assert_eq!(format_amount(Decimal::new(1005, 3), 2, ","), "1.01");
        assert_eq!(format_amount(Decimal::new(-1, 3), 2, ","), "0.00");
        assert_eq!(format_amount(Decimal::new(15, 1), 0, ","), "2");
    }
}
