use std::{
    fmt::{self, Display},
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{de, de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// The number of fractional digits carried by every [`FixedPoint`] value.
pub const FIXED_POINT_SCALE: u32 = 2;
/// The maximum number of significant digits (integer and fractional) a [`FixedPoint`] value may hold.
pub const FIXED_POINT_MAX_DIGITS: u32 = 11;

const MAX_HUNDREDTHS: i64 = 99_999_999_999;

//--------------------------------------     FixedPoint       ---------------------------------------------------------
/// An exact decimal number with exactly two fractional digits.
///
/// Offer amounts, deal amounts and exchange rates are all `FixedPoint` values. Internally the value is a count of
/// hundredths, so comparison and subtraction never suffer from binary floating-point rounding, no matter how many
/// partial deals are taken against the same offer.
///
/// On the wire a `FixedPoint` is written as a decimal string (`"900.00"`). It can be read from a string or from a
/// JSON number, as long as the number has no more than two fractional digits.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[sqlx(transparent)]
pub struct FixedPoint(i64);

op!(binary FixedPoint, Add, add);
op!(binary FixedPoint, Sub, sub);
op!(inplace FixedPoint, AddAssign, add_assign);
op!(inplace FixedPoint, SubAssign, sub_assign);
op!(unary FixedPoint, Neg, neg);

impl Sum for FixedPoint {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedPointConversionError {
    #[error("{0} has more than {FIXED_POINT_SCALE} decimal places")]
    TooManyDecimalPlaces(String),
    #[error("{0} does not fit in {FIXED_POINT_MAX_DIGITS} digits")]
    OutOfRange(String),
    #[error("{0} is not a valid decimal number")]
    InvalidNumber(String),
}

impl FixedPoint {
    pub const ZERO: FixedPoint = FixedPoint(0);

    /// Creates a value from a raw count of hundredths, e.g. `from_hundredths(10025)` is `100.25`.
    pub fn from_hundredths(value: i64) -> Self {
        Self(value)
    }

    /// Creates a value from a whole number of units, e.g. `from_units(9)` is `9.00`.
    pub fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// The raw count of hundredths.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, FIXED_POINT_SCALE)
    }
}

impl TryFrom<Decimal> for FixedPoint {
    type Error = FixedPointConversionError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let scaled = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| FixedPointConversionError::OutOfRange(value.to_string()))?;
        if !scaled.fract().is_zero() {
            return Err(FixedPointConversionError::TooManyDecimalPlaces(value.to_string()));
        }
        match scaled.to_i64() {
            Some(v) if (-MAX_HUNDREDTHS..=MAX_HUNDREDTHS).contains(&v) => Ok(Self(v)),
            _ => Err(FixedPointConversionError::OutOfRange(value.to_string())),
        }
    }
}

impl From<FixedPoint> for Decimal {
    fn from(value: FixedPoint) -> Self {
        value.to_decimal()
    }
}

impl FromStr for FixedPoint {
    type Err = FixedPointConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let decimal = Decimal::from_str(s).map_err(|_| FixedPointConversionError::InvalidNumber(s.to_string()))?;
        Self::try_from(decimal)
    }
}

impl Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Serialize for FixedPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FixedPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FixedPointVisitor)
    }
}

struct FixedPointVisitor;

impl<'de> Visitor<'de> for FixedPointVisitor {
    type Value = FixedPoint;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a decimal number with at most {FIXED_POINT_SCALE} decimal places")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        FixedPoint::try_from(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        FixedPoint::try_from(Decimal::from(v)).map_err(E::custom)
    }

    // The shortest round-trip representation of the float is what the client wrote, e.g. `10.44`, so parse that
    // rather than the binary approximation.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom(FixedPointConversionError::InvalidNumber(v.to_string())));
        }
        v.to_string().parse().map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}
