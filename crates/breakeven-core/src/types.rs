use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%) unless a field says otherwise.
pub type Rate = Decimal;

/// Decimal places kept for values the editor stores back into its inputs.
pub const DISPLAY_DP: u32 = 2;

/// Wire label for an unreachable quantity.
pub const UNBOUNDED_LABEL: &str = "Infinity";

/// Round to display precision, midpoint away from zero.
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// A derived quantity that is either a finite decimal or unreachable (`+∞`).
///
/// Arithmetic with a finite operand keeps `Unbounded` unbounded, including
/// multiplication by zero, so no indeterminate value can appear. Only
/// overflow toward `+∞` becomes `Unbounded`; overflow toward `-∞` saturates
/// at `Decimal::MIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extent {
    Finite(Decimal),
    Unbounded,
}

impl Extent {
    pub const ZERO: Extent = Extent::Finite(Decimal::ZERO);

    pub fn is_finite(&self) -> bool {
        matches!(self, Extent::Finite(_))
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Extent::Unbounded)
    }

    /// The finite value, or `None` when unreachable.
    pub fn finite(&self) -> Option<Decimal> {
        match self {
            Extent::Finite(v) => Some(*v),
            Extent::Unbounded => None,
        }
    }

    /// `numerator / denominator`; a zero denominator is unbounded, and a
    /// quotient beyond Decimal range follows `overflowed`.
    pub fn ratio(numerator: Decimal, denominator: Decimal) -> Extent {
        if denominator.is_zero() {
            return Extent::Unbounded;
        }
        numerator.checked_div(denominator).map_or_else(
            || overflowed(numerator.is_sign_negative() != denominator.is_sign_negative()),
            Extent::Finite,
        )
    }

    /// Divide by a finite value.
    pub fn divided_by(self, denominator: Decimal) -> Extent {
        match self {
            Extent::Finite(v) => Extent::ratio(v, denominator),
            Extent::Unbounded => Extent::Unbounded,
        }
    }
}

/// Result of an operation that left Decimal range.
fn overflowed(toward_negative: bool) -> Extent {
    if toward_negative {
        Extent::Finite(Decimal::MIN)
    } else {
        Extent::Unbounded
    }
}

impl Default for Extent {
    fn default() -> Self {
        Extent::ZERO
    }
}

impl From<Decimal> for Extent {
    fn from(v: Decimal) -> Self {
        Extent::Finite(v)
    }
}

impl Add<Decimal> for Extent {
    type Output = Extent;

    fn add(self, rhs: Decimal) -> Extent {
        match self {
            Extent::Finite(v) => v
                .checked_add(rhs)
                .map_or_else(|| overflowed(rhs.is_sign_negative()), Extent::Finite),
            Extent::Unbounded => Extent::Unbounded,
        }
    }
}

impl Sub<Decimal> for Extent {
    type Output = Extent;

    fn sub(self, rhs: Decimal) -> Extent {
        match self {
            Extent::Finite(v) => v
                .checked_sub(rhs)
                .map_or_else(|| overflowed(rhs.is_sign_positive()), Extent::Finite),
            Extent::Unbounded => Extent::Unbounded,
        }
    }
}

impl Mul<Decimal> for Extent {
    type Output = Extent;

    fn mul(self, rhs: Decimal) -> Extent {
        match self {
            Extent::Finite(v) => v.checked_mul(rhs).map_or_else(
                || overflowed(v.is_sign_negative() != rhs.is_sign_negative()),
                Extent::Finite,
            ),
            Extent::Unbounded => Extent::Unbounded,
        }
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Finite(v) => write!(f, "{}", v),
            Extent::Unbounded => f.write_str("∞"),
        }
    }
}

impl Serialize for Extent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Extent::Finite(v) => Serialize::serialize(v, serializer),
            Extent::Unbounded => serializer.serialize_str(UNBOUNDED_LABEL),
        }
    }
}

impl<'de> Deserialize<'de> for Extent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(Decimal),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(Extent::Finite(v)),
            Repr::Text(s) => match s.trim() {
                "Infinity" | "inf" | "∞" => Ok(Extent::Unbounded),
                other => Decimal::from_str(other)
                    .map(Extent::Finite)
                    .map_err(serde::de::Error::custom),
            },
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unbounded_absorbs_arithmetic() {
        assert_eq!(Extent::Unbounded + dec!(5), Extent::Unbounded);
        assert_eq!(Extent::Unbounded - dec!(5), Extent::Unbounded);
        assert_eq!(Extent::Unbounded * dec!(0), Extent::Unbounded);
        assert_eq!(Extent::Unbounded.divided_by(dec!(3)), Extent::Unbounded);
    }

    #[test]
    fn test_ratio_zero_denominator_is_unbounded() {
        assert_eq!(Extent::ratio(dec!(10), dec!(0)), Extent::Unbounded);
        assert_eq!(Extent::ratio(dec!(10), dec!(4)), Extent::Finite(dec!(2.5)));
    }

    #[test]
    fn test_ratio_overflow_is_unbounded() {
        assert_eq!(Extent::ratio(Decimal::MAX, dec!(0.5)), Extent::Unbounded);
    }

    #[test]
    fn test_negative_overflow_saturates_at_min() {
        assert_eq!(
            Extent::ratio(Decimal::MIN, dec!(0.5)),
            Extent::Finite(Decimal::MIN)
        );
        assert_eq!(
            Extent::ratio(Decimal::MAX, dec!(-0.5)),
            Extent::Finite(Decimal::MIN)
        );
        assert_eq!(
            Extent::Finite(Decimal::MIN) + dec!(-1),
            Extent::Finite(Decimal::MIN)
        );
        assert_eq!(
            Extent::Finite(Decimal::MIN) - dec!(1),
            Extent::Finite(Decimal::MIN)
        );
        assert_eq!(
            Extent::Finite(Decimal::MAX) * dec!(-2),
            Extent::Finite(Decimal::MIN)
        );
        // positive overflow is still unreachable
        assert_eq!(Extent::Finite(Decimal::MAX) + dec!(1), Extent::Unbounded);
        assert_eq!(Extent::Finite(Decimal::MIN) * dec!(-2), Extent::Unbounded);
    }

    #[test]
    fn test_extent_serde() {
        let json = serde_json::to_string(&Extent::Unbounded).unwrap();
        assert_eq!(json, "\"Infinity\"");
        let json = serde_json::to_string(&Extent::Finite(dec!(12.5))).unwrap();
        assert_eq!(json, "\"12.5\"");

        let back: Extent = serde_json::from_str("\"Infinity\"").unwrap();
        assert_eq!(back, Extent::Unbounded);
        let back: Extent = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(back, Extent::Finite(dec!(12.5)));
        let back: Extent = serde_json::from_str("300").unwrap();
        assert_eq!(back, Extent::Finite(dec!(300)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Extent::Unbounded.to_string(), "∞");
        assert_eq!(Extent::Finite(dec!(1.5)).to_string(), "1.5");
    }

    #[test]
    fn test_round_display_midpoint_away_from_zero() {
        assert_eq!(round_display(dec!(1.005)), dec!(1.01));
        assert_eq!(round_display(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_display(dec!(16600)), dec!(16600));
    }
}
