//! Command structs for engine write operations.
//!
//! `New*` types carry the fields of a create call. Fields the caller may leave
//! out are `Option`s; the engine applies defaults and reports missing required
//! fields as [`EngineError::MissingField`](crate::EngineError::MissingField).
//!
//! `*Patch` types carry partial updates. `None` keeps the stored value. For
//! nullable columns the inner `Option` distinguishes "clear" (`Some(None)`)
//! from "set" (`Some(Some(v))`).

use chrono::NaiveDate;

use crate::{
    Money,
    accounts::AccountType,
    assets::DepreciationMethod,
    budgets::BudgetState,
    journals::JournalType,
    moves::MoveState,
    partners::PartnerType,
    tax::{AmountType, CalculationMethod},
    tax_groups::VatType,
    tax_periods::ReportFrequency,
    taxes::{TaxCategory, TaxUse},
};

#[derive(Clone, Debug, Default)]
pub struct NewAccount {
    pub name: Option<String>,
    pub code: Option<String>,
    pub account_type: Option<AccountType>,
    pub parent_id: Option<i32>,
}

impl NewAccount {
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            name: Some(name.into()),
            code: Some(code.into()),
            account_type: Some(account_type),
            parent_id: None,
        }
    }

    #[must_use]
    pub fn parent_id(mut self, parent_id: i32) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub account_type: Option<AccountType>,
    pub parent_id: Option<Option<i32>>,
}

#[derive(Clone, Debug, Default)]
pub struct NewJournal {
    pub name: Option<String>,
    pub code: Option<String>,
    pub journal_type: Option<JournalType>,
    pub active: Option<bool>,
}

impl NewJournal {
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>, journal_type: JournalType) -> Self {
        Self {
            name: Some(name.into()),
            code: Some(code.into()),
            journal_type: Some(journal_type),
            active: None,
        }
    }
}

/// One debit/credit line of a journal entry.
#[derive(Clone, Debug, Default)]
pub struct NewMoveLine {
    pub account_id: Option<i32>,
    pub partner_id: Option<i32>,
    pub name: Option<String>,
    pub debit: Money,
    pub credit: Money,
}

impl NewMoveLine {
    #[must_use]
    pub fn debit(account_id: i32, amount: Money) -> Self {
        Self {
            account_id: Some(account_id),
            debit: amount,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn credit(account_id: i32, amount: Money) -> Self {
        Self {
            account_id: Some(account_id),
            credit: amount,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn partner_id(mut self, partner_id: i32) -> Self {
        self.partner_id = Some(partner_id);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewJournalEntry {
    pub name: Option<String>,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub reference: Option<String>,
    /// Defaults to the first journal, created on demand.
    pub journal_id: Option<i32>,
    pub state: Option<MoveState>,
    pub lines: Vec<NewMoveLine>,
}

/// Partial update of a journal entry. `lines`, when present, replaces every
/// existing line.
#[derive(Clone, Debug, Default)]
pub struct JournalEntryPatch {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub reference: Option<Option<String>>,
    pub journal_id: Option<i32>,
    pub state: Option<MoveState>,
    pub lines: Option<Vec<NewMoveLine>>,
}

#[derive(Clone, Debug, Default)]
pub struct NewPartner {
    pub name: Option<String>,
    pub code: Option<String>,
    pub partner_type: Option<PartnerType>,
    pub vat: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct PartnerPatch {
    pub name: Option<String>,
    pub code: Option<Option<String>>,
    pub partner_type: Option<PartnerType>,
    pub vat: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct NewAsset {
    pub name: Option<String>,
    /// Generated from the `ASSET` sequence when absent.
    pub code: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub value: Option<Money>,
    pub depreciation_method: Option<DepreciationMethod>,
    pub useful_life: Option<i32>,
    pub residual_value: Option<Money>,
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub code: Option<Option<String>>,
    pub purchase_date: Option<Option<NaiveDate>>,
    pub value: Option<Money>,
    pub depreciation_method: Option<DepreciationMethod>,
    pub useful_life: Option<Option<i32>>,
    pub residual_value: Option<Money>,
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct NewBudget {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub account_id: Option<i32>,
    pub state: Option<BudgetState>,
}

#[derive(Clone, Debug, Default)]
pub struct NewCurrency {
    pub name: Option<String>,
    pub code: Option<String>,
    pub symbol: Option<String>,
    pub rate: Option<f64>,
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct NewTax {
    pub name: Option<String>,
    /// Generated as `TAX{year}{seq:06}` when absent.
    pub code: Option<String>,
    pub sequence: Option<i32>,
    pub active: Option<bool>,
    /// Defaults to 10.
    pub amount: Option<f64>,
    pub amount_type: Option<AmountType>,
    pub type_tax_use: Option<TaxUse>,
    pub tax_category: Option<TaxCategory>,
    pub calculation_method: Option<CalculationMethod>,
    pub is_exempt: Option<bool>,
    pub exempt_reason: Option<String>,
    pub account_id: Option<i32>,
    pub refund_account_id: Option<i32>,
    pub tax_group_id: Option<i32>,
    pub report_frequency: Option<ReportFrequency>,
    pub effective_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct TaxPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub sequence: Option<i32>,
    pub active: Option<bool>,
    pub amount: Option<f64>,
    pub amount_type: Option<AmountType>,
    pub type_tax_use: Option<TaxUse>,
    pub tax_category: Option<TaxCategory>,
    pub calculation_method: Option<CalculationMethod>,
    pub is_exempt: Option<bool>,
    pub exempt_reason: Option<Option<String>>,
    pub account_id: Option<Option<i32>>,
    pub refund_account_id: Option<Option<i32>>,
    pub tax_group_id: Option<Option<i32>>,
    pub report_frequency: Option<ReportFrequency>,
    pub effective_date: Option<Option<NaiveDate>>,
    pub expiry_date: Option<Option<NaiveDate>>,
    pub description: Option<Option<String>>,
}

#[derive(Clone, Debug, Default)]
pub struct NewTaxGroup {
    pub name: Option<String>,
    pub code: Option<String>,
    pub is_vat_group: Option<bool>,
    pub vat_type: Option<VatType>,
    pub reporting_period: Option<ReportFrequency>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct NewTaxPeriod {
    pub name: Option<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub active: Option<bool>,
    pub period_type: Option<ReportFrequency>,
    pub deadline_date: Option<NaiveDate>,
}

/// Create a tax report. The state always starts as draft and `vat_payable`
/// is derived.
#[derive(Clone, Debug, Default)]
pub struct NewTaxReport {
    pub name: Option<String>,
    /// Defaults to today, as do both period bounds.
    pub date: Option<NaiveDate>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub report_type: Option<ReportFrequency>,
    pub additional_period: Option<String>,
    pub sale_vat: Option<Money>,
    pub purchase_vat: Option<Money>,
    pub exempt: Option<Money>,
    pub zero_rated: Option<Money>,
    pub withholding: Option<Money>,
    pub notes: Option<String>,
    pub tax_period_id: Option<i32>,
    pub tax_ids: Vec<i32>,
}

#[derive(Clone, Debug, Default)]
pub struct TaxReportPatch {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub report_type: Option<ReportFrequency>,
    pub additional_period: Option<Option<String>>,
    pub sale_vat: Option<Money>,
    pub purchase_vat: Option<Money>,
    pub exempt: Option<Money>,
    pub zero_rated: Option<Money>,
    pub withholding: Option<Money>,
    pub notes: Option<Option<String>>,
    pub tax_period_id: Option<Option<i32>>,
    /// Replaces the linked taxes when present.
    pub tax_ids: Option<Vec<i32>>,
}
