use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const INR_CURRENCY_CODE: &str = "INR";
pub const INR_CURRENCY_CODE_LOWER: &str = "inr";

//--------------------------------------      Rupees       -----------------------------------------------------------
/// A monetary amount in Indian Rupees, stored as an integer number of paise.
///
/// Storing paise rather than a float keeps arithmetic exact and lets the value be persisted as a plain integer
/// column.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Rupees(i64);

op!(binary Rupees, Add, add);
op!(binary Rupees, Sub, sub);
op!(inplace Rupees, SubAssign, sub_assign);
op!(unary Rupees, Neg, neg);

impl Mul<i64> for Rupees {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Rupees {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in paise: {0}")]
pub struct RupeesConversionError(pub String);

impl From<i64> for Rupees {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Rupees {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Rupees {}

impl TryFrom<u64> for Rupees {
    type Error = RupeesConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(RupeesConversionError(format!("Value {} is too large to convert to Rupees", value)))
        } else {
            Ok(Self(value as i64))
        }
    }
}

impl Display for Rupees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let paise = self.0.abs();
        write!(f, "{sign}₹{}.{:02}", paise / 100, paise % 100)
    }
}

impl FromStr for Rupees {
    type Err = RupeesConversionError;

    /// Parses a decimal price string, e.g. "500.00", into a paise amount. Gateways express amounts as decimal
    /// strings or numbers, so at most two fractional digits are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // The sign comes from the raw string: "-0.50" parses its whole part to 0, which has no sign.
        let negative = s.starts_with('-');
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        let whole = whole.parse::<i64>().map_err(|e| RupeesConversionError(format!("Invalid price {s}: {e}")))?;
        let frac = match frac.len() {
            0 => 0,
            1 | 2 => {
                let f = frac.parse::<i64>().map_err(|e| RupeesConversionError(format!("Invalid price {s}: {e}")))?;
                if frac.len() == 1 {
                    f * 10
                } else {
                    f
                }
            },
            _ => return Err(RupeesConversionError(format!("Too many decimal places in price: {s}"))),
        };
        let frac = if negative { -frac } else { frac };
        Ok(Self(whole * 100 + frac))
    }
}

impl Rupees {
    /// The amount in paise.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_rupees(rupees: i64) -> Self {
        Self(rupees * 100)
    }

    /// The amount as a decimal number of rupees, the representation the gateway API expects.
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}
