//! Arbitrary-precision values and the range they are drawn from.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

use realix_core::error::AppError;
use realix_core::result::AppResult;

use super::source::RandomSource;

/// An issued value. Never zero, never above the allocator's bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Value(BigUint);

impl Value {
    /// Canonical decimal key used by the used-value set.
    pub fn key(&self) -> String {
        self.0.to_string()
    }

    /// Borrow the underlying integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serialized as a bare JSON number with every digit preserved.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(self.key()).map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

/// Inclusive upper bound `U` of the draw range `[1, U]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpperBound(BigUint);

impl UpperBound {
    /// Wraps `bound`, rejecting zero.
    pub fn new(bound: BigUint) -> AppResult<Self> {
        if bound == BigUint::from(0u32) {
            return Err(AppError::configuration(
                "allocator upper bound must be at least 1",
            ));
        }
        Ok(Self(bound))
    }

    /// Borrow the underlying integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Returns `true` if `value` lies in `[1, U]`.
    pub fn contains(&self, value: &Value) -> bool {
        value.0 >= BigUint::from(1u32) && value.0 <= self.0
    }

    /// Draws a value uniformly from `[1, U]`.
    ///
    /// Rejection-samples `[0, U)` from just enough random bytes to cover
    /// `U`'s bit length, then shifts by one. Each round succeeds with
    /// probability at least one half. A failing source aborts the draw.
    pub fn draw(&self, source: &dyn RandomSource) -> AppResult<Value> {
        let bits = self.0.bits();
        let len = bits.div_ceil(8) as usize;
        let mask = 0xffu8 >> (len as u64 * 8 - bits);
        let mut buf = vec![0u8; len];

        loop {
            source.fill(&mut buf)?;
            buf[0] &= mask;
            let candidate = BigUint::from_bytes_be(&buf);
            if candidate < self.0 {
                return Ok(Value(candidate + 1u32));
            }
        }
    }
}

impl FromStr for UpperBound {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bound = s.trim().parse::<BigUint>().map_err(|e| {
            AppError::configuration(format!("invalid allocator upper bound '{s}': {e}"))
        })?;
        Self::new(bound)
    }
}

impl fmt::Display for UpperBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
