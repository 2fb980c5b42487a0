use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount represented as **integer piastres** (1/100 EGP).
///
/// Use this type for all monetary values in the engine (salary, expense
/// values, commitment balances) to avoid floating-point drift. The value is
/// signed because a balance may legitimately go negative; entity constructors
/// reject negative amounts where the data model requires them non-negative.
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34 EGP");
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the smaller of two amounts.
    #[must_use]
    pub fn min(self, rhs: Money) -> Money {
        Money(self.0.min(rhs.0))
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02} EGP", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money(iter.map(|m| m.0).sum())
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`. Rejects empty strings, garbage, and more than two fractional
    /// digits. This is the boundary where loosely typed form input becomes a
    /// validated amount.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped.trim())
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped.trim())
        } else {
            (1i64, trimmed)
        };
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let (units_str, frac_str) = match rest.split_once('.') {
            None => (rest.as_str(), ""),
            Some((units, frac)) => {
                if frac.contains('.') {
                    return Err(invalid());
                }
                (units, frac)
            }
        };

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let units: i64 = units_str.parse().map_err(|_| invalid())?;

        let cents: i64 = match frac_str.len() {
            0 => 0,
            len @ (1 | 2) => {
                if !frac_str.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let parsed: i64 = frac_str.parse().map_err(|_| invalid())?;
                if len == 1 { parsed * 10 } else { parsed }
            }
            _ => {
                return Err(EngineError::InvalidAmount(
                    "too many decimals".to_string(),
                ));
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;
        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}
