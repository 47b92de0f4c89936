//! # Amount Conversion
//!
//! The ledger counts money in integer smallest units, 10^9 per display
//! unit. Conversions toward the ledger truncate (floor) at nine decimals;
//! conversions toward the user round to four decimals.
//!
//! ```text
//! "1.5"  ──to_smallest──→  1_500_000_000  ──to_display──→  "1.5000"
//! ```

use crate::error::CodecError;

/// Smallest units per display unit.
pub const SMALLEST_UNITS_PER_DISPLAY: u64 = 1_000_000_000;

/// Fractional digits of the smallest unit.
const SMALLEST_DECIMALS: usize = 9;

/// Fractional digits shown to users.
pub const DISPLAY_DECIMALS: usize = 4;

/// Convert a display amount to smallest units, truncating below 10^-9.
///
/// Fails with `InvalidAmount` for negative, NaN, infinite or overflowing
/// input.
pub fn to_smallest_unit(amount: f64) -> Result<u64, CodecError> {
    if !amount.is_finite() {
        return Err(CodecError::InvalidAmount(format!(
            "{} is not a finite number",
            amount
        )));
    }
    if amount < 0.0 {
        return Err(CodecError::InvalidAmount(format!("{} is negative", amount)));
    }
    let scaled = (amount * SMALLEST_UNITS_PER_DISPLAY as f64).floor();
    // 2^64 is exactly representable; anything at or above it overflows.
    if scaled >= 18_446_744_073_709_551_616.0 {
        return Err(CodecError::InvalidAmount(format!("{} is out of range", amount)));
    }
    Ok(scaled as u64)
}

/// Parse a textual display amount into smallest units.
///
/// Plain decimals (`"12"`, `"1.5"`, `".25"`) are converted exactly, digits
/// past the ninth decimal are dropped. Anything else that parses as a
/// float (`"1e3"`) goes through [`to_smallest_unit`].
pub fn parse_display_amount(input: &str) -> Result<u64, CodecError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CodecError::InvalidAmount("empty amount".to_string()));
    }
    if let Some(value) = parse_plain_decimal(trimmed)? {
        return Ok(value);
    }
    match trimmed.parse::<f64>() {
        Ok(amount) => to_smallest_unit(amount),
        Err(_) => Err(CodecError::InvalidAmount(format!(
            "'{}' is not a number",
            trimmed
        ))),
    }
}

/// Exact conversion for `digits[.digits]`. `Ok(None)` when the input is not
/// in that form.
fn parse_plain_decimal(input: &str) -> Result<Option<u64>, CodecError> {
    let (whole, fraction) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Ok(None);
    }

    let overflow = || CodecError::InvalidAmount(format!("{} is out of range", input));
    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let mut fraction: String = fraction.chars().take(SMALLEST_DECIMALS).collect();
    while fraction.len() < SMALLEST_DECIMALS {
        fraction.push('0');
    }
    let fraction: u64 = fraction.parse().map_err(|_| overflow())?;

    whole
        .checked_mul(SMALLEST_UNITS_PER_DISPLAY)
        .and_then(|w| w.checked_add(fraction))
        .map(Some)
        .ok_or_else(overflow)
}

/// Format smallest units as a display amount with four decimals
/// (half-up rounding).
pub fn to_display_unit(smallest: u64) -> String {
    const STEP: u64 = SMALLEST_UNITS_PER_DISPLAY / 10_000;
    let scaled = smallest as u128 + (STEP as u128 / 2);
    let ten_thousandths = scaled / STEP as u128;
    format!(
        "{}.{:0width$}",
        ten_thousandths / 10_000,
        ten_thousandths % 10_000,
        width = DISPLAY_DECIMALS
    )
}

/// Parse a smallest-unit amount as received in text (RPC strings, CLI
/// arguments). Negative or non-numeric input is `InvalidAmount`.
pub fn parse_smallest_unit(input: &str) -> Result<u64, CodecError> {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err(CodecError::InvalidAmount(format!("{} is negative", trimmed)));
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| CodecError::InvalidAmount(format!("'{}' is not a whole number", trimmed)))
}

/// [`to_display_unit`] for textual input.
pub fn to_display_unit_str(input: &str) -> Result<String, CodecError> {
    parse_smallest_unit(input).map(to_display_unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_one_and_a_half() {
        assert_eq!(to_smallest_unit(1.5).unwrap(), 1_500_000_000);
        assert_eq!(parse_display_amount("1.5").unwrap(), 1_500_000_000);
    }

    #[test]
    fn test_invalid_amounts() {
        assert!(matches!(to_smallest_unit(-1.0), Err(CodecError::InvalidAmount(_))));
        assert!(matches!(to_smallest_unit(f64::NAN), Err(CodecError::InvalidAmount(_))));
        assert!(matches!(to_smallest_unit(f64::INFINITY), Err(CodecError::InvalidAmount(_))));
        assert!(matches!(to_smallest_unit(1e20), Err(CodecError::InvalidAmount(_))));
        assert!(parse_display_amount("-1").is_err());
        assert!(parse_display_amount("abc").is_err());
        assert!(parse_display_amount("").is_err());
        assert!(parse_display_amount("NaN").is_err());
    }

    #[test]
    fn test_truncates_past_nine_decimals() {
        assert_eq!(parse_display_amount("0.0000000019").unwrap(), 1);
        assert_eq!(parse_display_amount(".25").unwrap(), 250_000_000);
        assert_eq!(parse_display_amount("3").unwrap(), 3_000_000_000);
        assert_eq!(parse_display_amount("1e3").unwrap(), 1_000_000_000_000);
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(to_display_unit(0), "0.0000");
        assert_eq!(to_display_unit(1_500_000_000), "1.5000");
        assert_eq!(to_display_unit(1_234_567_890), "1.2346");
        assert_eq!(to_display_unit(99_999), "0.0001");
        assert_eq!(to_display_unit(49_999), "0.0000");
        assert_eq!(to_display_unit(u64::MAX), "18446744073.7096");
    }

    #[test]
    fn test_textual_smallest_units() {
        assert_eq!(to_display_unit_str("2500000000").unwrap(), "2.5000");
        assert!(matches!(to_display_unit_str("-5"), Err(CodecError::InvalidAmount(_))));
        assert!(matches!(to_display_unit_str("five"), Err(CodecError::InvalidAmount(_))));
    }

    proptest! {
        #[test]
        fn prop_round_trip_is_stable(x in 0.000_000_001f64..1_000_000.0) {
            let first = to_smallest_unit(x).unwrap();
            let second = parse_display_amount(&to_display_unit(first)).unwrap();
            let third = parse_display_amount(&to_display_unit(second)).unwrap();
            prop_assert_eq!(second, third);
        }

        #[test]
        fn prop_float_and_text_paths_agree_on_display(x in 0u64..1_000_000_000_000_000) {
            let shown = to_display_unit(x);
            let value: f64 = shown.parse().unwrap();
            prop_assert_eq!(to_display_unit(to_smallest_unit(value).unwrap()), shown);
        }
    }
}
