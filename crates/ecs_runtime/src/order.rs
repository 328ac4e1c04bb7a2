//! System ordering keys.
//!
//! Integers convert into a [`SystemOrder`] infallibly. Floats, strings and
//! JSON values convert fallibly and are rejected with
//! [`EcsError::InvalidOrder`] unless they hold an integer.

use std::str::FromStr;

use serde_json::Value;

use crate::error::EcsError;

/// Integer key deciding when a system runs within a frame. Lower runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemOrder(pub i64);

impl SystemOrder {
    /// Order given to systems registered without one. Sits in the middle of
    /// the signed range so hosts can schedule work on either side of it.
    pub const DEFAULT: SystemOrder = SystemOrder(0);

    /// Returns the raw key.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Default for SystemOrder {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for SystemOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! order_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SystemOrder {
                fn from(value: $ty) -> Self {
                    Self(i64::from(value))
                }
            }
        )*
    };
}

order_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl TryFrom<u64> for SystemOrder {
    type Error = EcsError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| EcsError::InvalidOrder(format!("{value} is out of range")))
    }
}

impl TryFrom<usize> for SystemOrder {
    type Error = EcsError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| EcsError::InvalidOrder(format!("{value} is out of range")))
    }
}

impl TryFrom<f64> for SystemOrder {
    type Error = EcsError;

    /// Accepts only finite whole numbers inside the `i64` range.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        // 2^63 is exact in f64; anything at or above it does not fit.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if !value.is_finite() || value.fract() != 0.0 || value < -LIMIT || value >= LIMIT {
            return Err(EcsError::InvalidOrder(format!("{value} is not an integer")));
        }
        Ok(Self(value as i64))
    }
}

impl TryFrom<f32> for SystemOrder {
    type Error = EcsError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::try_from(f64::from(value))
    }
}

impl FromStr for SystemOrder {
    type Err = EcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| EcsError::InvalidOrder(format!("{s:?} is not an integer")))
    }
}

impl TryFrom<&str> for SystemOrder {
    type Error = EcsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&Value> for SystemOrder {
    type Error = EcsError;

    /// Accepts JSON integers only; `1.0`, `"1"`, `true` and `null` are rejected.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self(i))
                } else if let Some(u) = n.as_u64() {
                    Self::try_from(u)
                } else {
                    Err(EcsError::InvalidOrder(format!("{n} is not an integer")))
                }
            }
            other => Err(EcsError::InvalidOrder(format!("{other} is not an integer"))),
        }
    }
}
