//! Depreciation schedule preview.
//!
//! [`schedule`] turns an asset's terms into one line per elapsed month between
//! the purchase date and a reference day. Nothing here touches the database:
//! the journal entries attached to each line are previews only.

use chrono::{Datelike, Months, NaiveDate};

use crate::{Money, assets::DepreciationMethod};

pub const DEPRECIATION_EXPENSE_ACCOUNT: &str = "Depreciation Expense";
pub const ACCUMULATED_DEPRECIATION_ACCOUNT: &str = "Accumulated Depreciation";

/// Longest useful life, in years, an asset may be registered with.
pub const MAX_USEFUL_LIFE: i32 = 100;

const MISSING_OR_FUTURE: &str = "purchase date missing or future";
const OUTSIDE_WINDOW: &str = "outside depreciation window";

/// Depreciation inputs of an asset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssetTerms {
    pub purchase_date: Option<NaiveDate>,
    pub value: Money,
    pub residual_value: Money,
    /// Years; anything below 1 is treated as 1.
    pub useful_life_years: i32,
    pub method: DepreciationMethod,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewLine {
    pub account_name: &'static str,
    pub debit: Money,
    pub credit: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewEntry {
    pub reference: String,
    pub lines: Vec<PreviewLine>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepreciationLine {
    pub date: NaiveDate,
    pub amount: Money,
    pub journal_entry: Option<PreviewEntry>,
    pub reason: String,
    pub useful_life: i32,
}

impl AssetTerms {
    fn useful_life(&self) -> i32 {
        self.useful_life_years.max(1)
    }

    /// Monthly depreciation, floored at zero and rounded to cents.
    ///
    /// The declining-balance branch reads accumulated depreciation as zero, so
    /// every month depreciates the full value at `1 / useful_life` per year.
    pub fn monthly_amount(&self) -> Money {
        let life = f64::from(self.useful_life());
        let total_months = life * 12.0;
        let monthly = match self.method {
            DepreciationMethod::Linear => {
                let base = i128::from(self.value.minor()) - i128::from(self.residual_value.minor());
                base as f64 / 100.0 / total_months
            }
            DepreciationMethod::Degressive => self.value.to_major() * (1.0 / life) / 12.0,
        };
        Money::from_major(monthly).floor_zero()
    }
}

/// Builds the monthly schedule of an asset as of `today`.
///
/// `batch_position` is the asset's 0-based position in the request and feeds
/// the `JV<YYYYMMDD>-<nnn>` journal references.
pub fn schedule(terms: &AssetTerms, today: NaiveDate, batch_position: usize) -> Vec<DepreciationLine> {
    let useful_life = terms.useful_life();
    let skipped = |reason: &str| {
        vec![DepreciationLine {
            date: today,
            amount: Money::ZERO,
            journal_entry: None,
            reason: reason.to_string(),
            useful_life,
        }]
    };

    let Some(purchase_date) = terms.purchase_date.filter(|date| *date <= today) else {
        return skipped(MISSING_OR_FUTURE);
    };

    let Some(total_months) = u32::try_from(useful_life)
        .ok()
        .and_then(|years| years.checked_mul(12))
    else {
        return skipped(OUTSIDE_WINDOW);
    };
    let Some(end_date) = purchase_date.checked_add_months(Months::new(total_months)) else {
        return skipped(OUTSIDE_WINDOW);
    };
    if today > end_date {
        return skipped(OUTSIDE_WINDOW);
    }

    let elapsed = (today.year() - purchase_date.year()) * 12 + today.month() as i32
        - purchase_date.month() as i32;
    let months = u32::try_from(elapsed)
        .unwrap_or(0)
        .saturating_add(1)
        .min(total_months);
    let amount = terms.monthly_amount();

    (0..months)
        .map_while(|m| {
            let date = purchase_date.checked_add_months(Months::new(m))?;
            Some(DepreciationLine {
                date,
                amount,
                journal_entry: Some(PreviewEntry {
                    reference: format!("JV{}-{:03}", date.format("%Y%m%d"), batch_position + 1),
                    lines: vec![
                        PreviewLine {
                            account_name: DEPRECIATION_EXPENSE_ACCOUNT,
                            debit: amount,
                            credit: Money::ZERO,
                        },
                        PreviewLine {
                            account_name: ACCUMULATED_DEPRECIATION_ACCOUNT,
                            debit: Money::ZERO,
                            credit: amount,
                        },
                    ],
                }),
                reason: format!("installment {}", m + 1),
                useful_life,
            })
        })
        .collect()
}
