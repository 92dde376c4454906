use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::{codec, NumberError};

/// Arbitrary-precision non-negative game quantity (soul eggs, earnings bonus).
///
/// `Display` writes the exact decimal digits; serde uses the suffixed form
/// (`"86.035Q"`) and accepts anything [`codec::decode`] accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Magnitude(BigUint);

impl Magnitude {
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn into_inner(self) -> BigUint {
        self.0
    }

    /// Nearest `f64`, or infinity when the value is out of range.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::INFINITY)
    }

    pub fn abs_diff(&self, other: &Magnitude) -> Magnitude {
        if self.0 >= other.0 {
            Self(&self.0 - &other.0)
        } else {
            Self(&other.0 - &self.0)
        }
    }

    pub fn saturating_sub(&self, other: &Magnitude) -> Magnitude {
        if self.0 > other.0 {
            Self(&self.0 - &other.0)
        } else {
            Self::zero()
        }
    }

    /// Suffixed display form, see [`codec::encode`].
    pub fn to_suffixed(&self) -> String {
        codec::encode(self)
    }
}

impl From<BigUint> for Magnitude {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u64> for Magnitude {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for Magnitude {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Magnitude {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::decode(s)
    }
}

impl Serialize for Magnitude {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_suffixed())
    }
}

struct MagnitudeVisitor;

impl<'de> Visitor<'de> for MagnitudeVisitor {
    type Value = Magnitude;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a suffixed number string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Magnitude, E> {
        codec::decode(value).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Magnitude, E> {
        Ok(Magnitude::from(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Magnitude, E> {
        u64::try_from(value)
            .map(Magnitude::from)
            .map_err(|_| E::custom(format!("negative magnitude: {}", value)))
    }
}

impl<'de> Deserialize<'de> for Magnitude {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MagnitudeVisitor)
    }
}
