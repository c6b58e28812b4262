//! Amount - non-negative fixed-point money value
//!
//! Stored as a count of micro-units (six fractional digits) so that sums over
//! many posts stay exact. Serialized to JSON as a plain number.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount must not be negative")]
    Negative,
    #[error("amount is out of range")]
    OutOfRange,
    #[error("amount is not a valid number")]
    InvalidFormat,
}

impl Amount {
    /// Micro-units per whole unit
    pub const SCALE: i64 = 1_000_000;
    const DECIMALS: usize = 6;

    pub const ZERO: Amount = Amount(0);

    /// Build from a raw micro-unit count (as stored in the database)
    pub fn from_micros(micros: i64) -> Result<Self, AmountError> {
        if micros < 0 {
            return Err(AmountError::Negative);
        }
        Ok(Self(micros))
    }

    #[inline]
    pub const fn micros(self) -> i64 {
        self.0
    }

    /// Convert a client-supplied float, rounding to the nearest micro-unit
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::InvalidFormat);
        }
        if value < 0.0 {
            return Err(AmountError::Negative);
        }
        let scaled = (value * Self::SCALE as f64).round();
        if scaled > i64::MAX as f64 {
            return Err(AmountError::OutOfRange);
        }
        Ok(Self(scaled as i64))
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// Subtraction clamped at zero
    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0).max(0))
    }

    /// Multiply by an engagement count
    pub fn times(self, count: u64) -> Amount {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        Amount(self.0.saturating_mul(count))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Amount::saturating_add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::SCALE;
        let frac = self.0 % Self::SCALE;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:0width$}", width = Self::DECIMALS);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Exact decimal parsing, e.g. `"0.05"`; more than six decimals is rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(AmountError::Negative);
        }
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(AmountError::InvalidFormat);
        }
        if frac.len() > Self::DECIMALS
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AmountError::InvalidFormat);
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| AmountError::OutOfRange)?
        };
        let frac: i64 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<width$}", width = Self::DECIMALS);
            padded.parse().map_err(|_| AmountError::InvalidFormat)?
        };

        whole
            .checked_mul(Self::SCALE)
            .and_then(|w| w.checked_add(frac))
            .map(Amount)
            .ok_or(AmountError::OutOfRange)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a non-negative number or numeric string")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
                i64::try_from(value)
                    .ok()
                    .and_then(|v| v.checked_mul(Amount::SCALE))
                    .map(Amount)
                    .ok_or_else(|| E::custom(AmountError::OutOfRange))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
                if value < 0 {
                    return Err(E::custom(AmountError::Negative));
                }
                self.visit_u64(value.unsigned_abs())
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
                Amount::from_f64(value).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
