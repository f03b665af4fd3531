use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// A whole-number share of income, or `Unset` when there is no income to take a share of.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Percentage {
    #[default]
    Unset,
    Value(i64),
}

impl Percentage {
    /// Computes `round(part / whole * 100)`, or `Unset` when `whole` is not positive.
    ///
    /// Rounding is half-up (`floor(x + 0.5)`), so `12.5` becomes `13` and `-12.5` becomes `-12`.
    /// A ratio too large to represent is `Unset` rather than a panic.
    pub fn of(part: Decimal, whole: Decimal) -> Self {
        if whole <= Decimal::ZERO {
            return Percentage::Unset;
        }
        part.checked_div(whole)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|pct| pct.checked_add(Decimal::new(5, 1)))
            .and_then(|pct| pct.floor().to_i64())
            .map(Percentage::Value)
            .unwrap_or(Percentage::Unset)
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            Percentage::Unset => None,
            Percentage::Value(v) => Some(*v),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Percentage::Unset)
    }
}

/// `Unset` is written as `-1`, which is how the page has always represented it.
impl Display for Percentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Percentage::Unset => write!(f, "-1"),
            Percentage::Value(v) => write!(f, "{v}"),
        }
    }
}

/// Serialized as a number, with `null` for `Unset`.
impl Serialize for Percentage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Percentage::Unset => serializer.serialize_none(),
            Percentage::Value(v) => serializer.serialize_i64(*v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(part: i64, whole: i64) -> Percentage {
        Percentage::of(Decimal::from(part), Decimal::from(whole))
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(pct(50, 300), Percentage::Value(17));
        assert_eq!(pct(1, 8), Percentage::Value(13));
        assert_eq!(pct(-1, 8), Percentage::Value(-12));
        assert_eq!(pct(1, 3), Percentage::Value(33));
    }

    #[test]
    fn test_no_income_is_unset() {
        assert_eq!(pct(50, 0), Percentage::Unset);
        assert_eq!(pct(50, -10), Percentage::Unset);
    }

    #[test]
    fn test_overflow_is_unset() {
        let tiny = Decimal::new(1, 28);
        assert_eq!(Percentage::of(Decimal::MAX, tiny), Percentage::Unset);
    }

    #[test]
    fn test_over_one_hundred() {
        assert_eq!(pct(300, 100), Percentage::Value(300));
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(Percentage::Unset.to_string(), "-1");
        assert_eq!(Percentage::Value(25).to_string(), "25");
        assert_eq!(serde_json::to_string(&Percentage::Unset).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Percentage::Value(25)).unwrap(), "25");
    }
}
