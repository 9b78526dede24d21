//! Tax computation.
//!
//! A [`TaxRule`] is the numeric part of a tax configuration. [`TaxRule::compute_all`]
//! splits a monetary base into `{base, tax, total}`:
//!
//! | rule | tax | base | total |
//! |---|---|---|---|
//! | exempt | 0 | base | base |
//! | percent, exclusive | `base * rate / 100` | base | base + tax |
//! | percent, inclusive | `base * rate / (100 + rate)` | base - tax | base |
//! | fixed | `rate * quantity` | base | base + tax |
//!
//! Tax amounts are rounded to two decimals, half away from zero.

use sea_orm::entity::prelude::*;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum AmountType {
    #[default]
    #[sea_orm(string_value = "percent")]
    Percent,
    #[sea_orm(string_value = "fixed")]
    Fixed,
}

/// Whether the base already contains the tax.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum CalculationMethod {
    #[default]
    #[sea_orm(string_value = "exclusive")]
    Exclusive,
    #[sea_orm(string_value = "inclusive")]
    Inclusive,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaxRule {
    pub rate: f64,
    pub amount_type: AmountType,
    pub calculation_method: CalculationMethod,
    pub is_exempt: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaxBreakdown {
    pub base: Money,
    pub tax: Money,
    pub total: Money,
}

impl TaxRule {
    /// Tax due on `base`, ignoring the exemption flag.
    ///
    /// Fails with [`EngineError::InvalidValue`] when the tax does not fit in
    /// minor units (huge bases or fixed amounts times a huge quantity).
    pub fn compute_tax(&self, base: Money, quantity: f64) -> ResultEngine<Money> {
        let tax = match (self.amount_type, self.calculation_method) {
            (AmountType::Percent, CalculationMethod::Exclusive) => {
                base.to_major() * (self.rate / 100.0)
            }
            (AmountType::Percent, CalculationMethod::Inclusive) => {
                base.to_major() * (self.rate / (100.0 + self.rate))
            }
            (AmountType::Fixed, _) => self.rate * quantity,
        };
        Money::try_from_major(tax)
    }

    /// Full `{base, tax, total}` split of `base`.
    pub fn compute_all(&self, base: Money, quantity: f64) -> ResultEngine<TaxBreakdown> {
        if self.is_exempt {
            return Ok(TaxBreakdown {
                base,
                tax: Money::ZERO,
                total: base,
            });
        }

        let tax = self.compute_tax(base, quantity)?;
        let breakdown = match (self.amount_type, self.calculation_method) {
            (AmountType::Percent, CalculationMethod::Inclusive) => TaxBreakdown {
                base: base.try_sub(tax)?,
                tax,
                total: base,
            },
            _ => TaxBreakdown {
                base,
                tax,
                total: base.try_add(tax)?,
            },
        };
        Ok(breakdown)
    }
}
