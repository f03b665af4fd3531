//! Amount type for money typed in by the user.
//!
//! Values may or may not carry a currency sign and thousands separators. The parsed value is kept
//! as a `Decimal`; how the user originally typed it is not retained.

use rust_decimal::{Decimal, RoundingStrategy};
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The currency sign accepted when parsing, and used by default when displaying.
pub const DEFAULT_SYMBOL: &str = "$";

/// A money value entered by the user.
///
/// # Examples
///
/// ```
/// # use budgety::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,250.5").unwrap();
/// assert_eq!(amount.to_string(), "1,250.50");
/// assert_eq!(amount.with_symbol("$"), "$1,250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Zero is neither positive nor negative.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// The absolute value with two decimal places and thousands separators, e.g. `1,234.50`.
    /// Half a cent rounds away from zero.
    pub fn grouped(&self) -> String {
        let cents = self
            .0
            .abs()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{cents:.2}");
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        let mut grouped = String::with_capacity(text.len() + whole.len() / 3);
        for (ix, digit) in whole.chars().enumerate() {
            if ix > 0 && (whole.len() - ix) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        format!("{grouped}.{fraction}")
    }

    /// Formats with a currency `symbol` between the sign and the digits, e.g. `-$1,234.50`.
    pub fn with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{sign}{symbol}{}", self.grouped())
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug)]
pub enum AmountError {
    /// A second sign after the one that was already taken, e.g. `--5` or `-$-5`.
    ExtraSign(String),
    Decimal(rust_decimal::Error),
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::ExtraSign(s) => write!(f, "unexpected sign in '{s}'"),
            AmountError::Decimal(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::ExtraSign(_) => None,
            AmountError::Decimal(e) => Some(e),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::ZERO);
        }

        // "-$50.00", "-50.00", "$50.00" and "50.00" are all accepted
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let digits = unsigned
            .strip_prefix(DEFAULT_SYMBOL)
            .unwrap_or(unsigned)
            .replace(',', "");
        if digits.starts_with(['-', '+']) {
            return Err(AmountError::ExtraSign(s.to_string()));
        }

        let value = Decimal::from_str(&digits).map_err(AmountError::Decimal)?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{sign}{}", self.grouped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50").unwrap();
        assert_eq!(amount.value(), dec("50"));
    }

    #[test]
    fn test_parse_with_symbol_and_commas() {
        let amount = Amount::from_str("$1,234,567.89").unwrap();
        assert_eq!(amount.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_negative_with_symbol() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), dec("-50.00"));
        assert!(amount.is_negative());
    }

    #[test]
    fn test_parse_empty_is_zero() {
        let amount = Amount::from_str("   ").unwrap();
        assert!(amount.is_zero());
        assert!(!amount.is_positive());
        assert!(!amount.is_negative());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("twelve").is_err());
        assert!(Amount::from_str("$$5").is_err());
        assert!(matches!(
            Amount::from_str("--5"),
            Err(AmountError::ExtraSign(_))
        ));
        assert!(Amount::from_str("-$-5").is_err());
        assert!(Amount::from_str("$+5").is_err());
    }

    #[test]
    fn test_display_rounds_to_cents() {
        let amount = Amount::new(dec("1234.5"));
        assert_eq!(amount.to_string(), "1,234.50");
        let amount = Amount::new(dec("-0.456"));
        assert_eq!(amount.to_string(), "-0.46");
    }

    #[test]
    fn test_with_symbol() {
        assert_eq!(Amount::new(dec("60000")).with_symbol("$"), "$60,000.00");
        assert_eq!(Amount::new(dec("-60000")).with_symbol("€"), "-€60,000.00");
    }

    #[test]
    fn test_grouped_large_values_are_exact() {
        let amount = Amount::new(dec("12345678901234567.89"));
        assert_eq!(amount.grouped(), "12,345,678,901,234,567.89");
        assert_eq!(Amount::new(dec("999.995")).grouped(), "1,000.00");
        assert_eq!(Amount::new(dec("100000")).grouped(), "100,000.00");
        assert_eq!(Amount::ZERO.grouped(), "0.00");
    }
}
