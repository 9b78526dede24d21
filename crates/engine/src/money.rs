use std::fmt;

use crate::{EngineError, ResultEngine};

const SCALE: f64 = 100.0;

/// Signed money amount represented as **integer minor units** (cents).
///
/// Every monetary column (move lines, asset values, budgets, report totals) is
/// stored through this type. Values cross the HTTP boundary as JSON numbers in
/// major units and are converted with [`Money::try_from_major`] /
/// [`Money::to_major`].
///
/// Arithmetic is checked: sums and differences that leave the `i64` range
/// fail with [`EngineError::InvalidValue`] instead of wrapping or panicking.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// assert_eq!(Money::from_major(10.005).minor(), 1001);
/// assert!(Money::try_from_major(f64::INFINITY).is_err());
/// assert!(Money::new(i64::MAX).try_add(Money::new(1)).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Converts a major-unit amount, rounding half away from zero to the
    /// nearest minor unit.
    ///
    /// Non-finite input maps to zero and out-of-range input saturates; use
    /// [`Money::try_from_major`] for values that come from outside.
    #[must_use]
    pub fn from_major(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Self(Self::scale(value).round() as i64)
    }

    /// Like [`Money::from_major`], but rejects NaN, infinities and amounts
    /// whose minor units do not fit in an `i64`.
    pub fn try_from_major(value: f64) -> ResultEngine<Self> {
        if !value.is_finite() {
            return Err(EngineError::InvalidValue(format!(
                "amount must be a finite number, got {value}"
            )));
        }
        let rounded = Self::scale(value).round();
        // i64::MAX is not representable in f64; 2^63 is the first value past it.
        if rounded >= 9_223_372_036_854_775_808.0 || rounded < -9_223_372_036_854_775_808.0 {
            return Err(out_of_range());
        }
        Ok(Self(rounded as i64))
    }

    // Nudge by a relative epsilon so values such as 1.005 (stored as
    // 1.00499999...) still round up.
    fn scale(value: f64) -> f64 {
        let scaled = value * SCALE;
        scaled + scaled.signum() * scaled.abs().max(1.0) * f64::EPSILON * 8.0
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns the value in major units.
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / SCALE
    }

    /// Clamps negative amounts to zero.
    #[must_use]
    pub fn floor_zero(self) -> Self {
        Self(self.0.max(0))
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    pub fn try_add(self, rhs: Money) -> ResultEngine<Money> {
        self.checked_add(rhs).ok_or_else(out_of_range)
    }

    pub fn try_sub(self, rhs: Money) -> ResultEngine<Money> {
        self.checked_sub(rhs).ok_or_else(out_of_range)
    }

    pub fn try_abs(self) -> ResultEngine<Money> {
        self.0.checked_abs().map(Money).ok_or_else(out_of_range)
    }

    /// Sums `amounts`, failing on the first overflow.
    pub fn try_sum(amounts: impl IntoIterator<Item = Money>) -> ResultEngine<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |total, amount| total.try_add(amount))
    }
}

fn out_of_range() -> EngineError {
    EngineError::InvalidValue("amount out of range".to_string())
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}
