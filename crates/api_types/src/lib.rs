//! JSON bodies exchanged with the accounting API.
//!
//! Money travels as JSON numbers in major units (`12.5` is twelve and a half).
//! Every response is wrapped in an [`Envelope`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// `{success, data?, message?, error?}` wrapper around every response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Query string of list endpoints that hide inactive records by default.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Use together with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub success: bool,
        pub message: String,
        pub version: String,
    }
}

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountType {
        Asset,
        Liability,
        Equity,
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: Option<String>,
        pub code: Option<String>,
        #[serde(rename = "type")]
        pub account_type: Option<AccountType>,
        pub parent_id: Option<i32>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub name: Option<String>,
        pub code: Option<String>,
        #[serde(rename = "type")]
        pub account_type: Option<AccountType>,
        /// `null` detaches the account from its parent.
        #[serde(default, deserialize_with = "double_option")]
        pub parent_id: Option<Option<i32>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Account {
        pub id: i32,
        pub name: String,
        pub code: String,
        #[serde(rename = "type")]
        pub account_type: AccountType,
        pub parent_id: Option<i32>,
        pub parent_name: Option<String>,
        pub child_ids: Vec<i32>,
    }
}

pub mod journal {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum JournalType {
        Sale,
        Purchase,
        Cash,
        Bank,
        General,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct JournalNew {
        pub name: Option<String>,
        pub code: Option<String>,
        #[serde(rename = "type")]
        pub journal_type: Option<JournalType>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Journal {
        pub id: i32,
        pub name: String,
        pub code: String,
        #[serde(rename = "type")]
        pub journal_type: JournalType,
        pub active: bool,
    }
}

pub mod journal_entry {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MoveState {
        Draft,
        Posted,
        Cancelled,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MoveLineNew {
        pub account_id: Option<i32>,
        pub partner_id: Option<i32>,
        pub name: Option<String>,
        #[serde(default)]
        pub debit: f64,
        #[serde(default)]
        pub credit: f64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct JournalEntryNew {
        pub name: Option<String>,
        pub date: Option<NaiveDate>,
        #[serde(rename = "ref")]
        pub reference: Option<String>,
        pub journal_id: Option<i32>,
        pub state: Option<MoveState>,
        #[serde(default, alias = "line_ids")]
        pub lines: Vec<MoveLineNew>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct JournalEntryUpdate {
        pub name: Option<String>,
        pub date: Option<NaiveDate>,
        #[serde(
            rename = "ref",
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub reference: Option<Option<String>>,
        pub journal_id: Option<i32>,
        pub state: Option<MoveState>,
        /// Replaces every existing line when present.
        #[serde(alias = "line_ids")]
        pub lines: Option<Vec<MoveLineNew>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MoveLine {
        pub id: i32,
        pub account_id: i32,
        pub account_code: String,
        pub account_name: String,
        pub partner_id: Option<i32>,
        pub partner_code: Option<String>,
        pub partner_name: Option<String>,
        pub name: Option<String>,
        pub debit: f64,
        pub credit: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct JournalEntry {
        pub id: i32,
        pub name: String,
        pub date: NaiveDate,
        #[serde(rename = "ref")]
        pub reference: Option<String>,
        pub journal_id: i32,
        pub state: MoveState,
        /// `Σdebit - Σcredit`.
        pub amount_total: f64,
        pub lines: Vec<MoveLine>,
    }
}

pub mod partner {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PartnerType {
        Customer,
        Supplier,
        Both,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PartnerNew {
        pub name: Option<String>,
        pub code: Option<String>,
        #[serde(rename = "type")]
        pub partner_type: Option<PartnerType>,
        pub vat: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PartnerUpdate {
        pub name: Option<String>,
        #[serde(default, deserialize_with = "double_option")]
        pub code: Option<Option<String>>,
        #[serde(rename = "type")]
        pub partner_type: Option<PartnerType>,
        #[serde(default, deserialize_with = "double_option")]
        pub vat: Option<Option<String>>,
        #[serde(default, deserialize_with = "double_option")]
        pub email: Option<Option<String>>,
        #[serde(default, deserialize_with = "double_option")]
        pub phone: Option<Option<String>>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Partner {
        pub id: i32,
        pub name: String,
        pub code: Option<String>,
        #[serde(rename = "type")]
        pub partner_type: PartnerType,
        pub vat: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub active: bool,
    }
}

pub mod asset {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DepreciationMethod {
        /// Straight line.
        Linear,
        /// Declining balance.
        Degressive,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AssetNew {
        pub name: Option<String>,
        pub code: Option<String>,
        pub purchase_date: Option<NaiveDate>,
        pub purchase_value: Option<f64>,
        pub depreciation_method: Option<DepreciationMethod>,
        /// Years.
        pub useful_life: Option<i32>,
        pub residual_value: Option<f64>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AssetUpdate {
        pub name: Option<String>,
        #[serde(default, deserialize_with = "double_option")]
        pub code: Option<Option<String>>,
        #[serde(default, deserialize_with = "double_option")]
        pub purchase_date: Option<Option<NaiveDate>>,
        pub purchase_value: Option<f64>,
        pub depreciation_method: Option<DepreciationMethod>,
        #[serde(default, deserialize_with = "double_option")]
        pub useful_life: Option<Option<i32>>,
        pub residual_value: Option<f64>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Asset {
        pub id: i32,
        pub name: String,
        pub code: Option<String>,
        pub purchase_date: Option<NaiveDate>,
        pub purchase_value: f64,
        /// Book value; depreciation is never posted, so this equals the
        /// purchase value.
        pub current_value: f64,
        pub depreciation_method: DepreciationMethod,
        pub useful_life: Option<i32>,
        pub residual_value: f64,
        pub active: bool,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DepreciateRequest {
        #[serde(default)]
        pub asset_ids: Vec<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepreciationJournalLine {
        pub account_name: String,
        pub debit: f64,
        pub credit: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepreciationJournal {
        #[serde(rename = "ref")]
        pub reference: String,
        pub lines: Vec<DepreciationJournalLine>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepreciationEntry {
        pub asset_id: i32,
        pub depreciation_amount: f64,
        pub date: NaiveDate,
        pub journal_entry: Option<DepreciationJournal>,
        pub reason: String,
        pub useful_life: i32,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetState {
        Draft,
        Confirmed,
        Closed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Budget {
        pub id: i32,
        pub name: String,
        pub fiscal_year: i32,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub account_id: Option<i32>,
        pub amount: f64,
        pub spent_amount: f64,
        pub remaining_amount: f64,
        pub state: BudgetState,
    }
}

pub mod currency {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Currency {
        pub id: i32,
        pub name: String,
        pub code: String,
        pub symbol: Option<String>,
        pub rate: f64,
        pub active: bool,
    }
}

pub mod tax {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AmountType {
        Percent,
        Fixed,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TaxUse {
        Sale,
        Purchase,
        Both,
        None,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TaxCategory {
        Vat,
        Withholding,
        Stamp,
        Customs,
        Other,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CalculationMethod {
        Exclusive,
        Inclusive,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ReportFrequency {
        Monthly,
        Quarterly,
        HalfYearly,
        Yearly,
    }

    /// `rate` and `type` are the public names of `amount` and `type_tax_use`;
    /// both spellings are accepted.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TaxNew {
        pub name: Option<String>,
        pub code: Option<String>,
        pub sequence: Option<i32>,
        pub active: Option<bool>,
        #[serde(alias = "amount")]
        pub rate: Option<f64>,
        pub amount_type: Option<AmountType>,
        #[serde(rename = "type", alias = "type_tax_use")]
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

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TaxUpdate {
        pub name: Option<String>,
        pub code: Option<String>,
        pub sequence: Option<i32>,
        pub active: Option<bool>,
        #[serde(alias = "amount")]
        pub rate: Option<f64>,
        pub amount_type: Option<AmountType>,
        #[serde(rename = "type", alias = "type_tax_use")]
        pub type_tax_use: Option<TaxUse>,
        pub tax_category: Option<TaxCategory>,
        pub calculation_method: Option<CalculationMethod>,
        pub is_exempt: Option<bool>,
        #[serde(default, deserialize_with = "double_option")]
        pub exempt_reason: Option<Option<String>>,
        #[serde(default, deserialize_with = "double_option")]
        pub account_id: Option<Option<i32>>,
        #[serde(default, deserialize_with = "double_option")]
        pub refund_account_id: Option<Option<i32>>,
        #[serde(default, deserialize_with = "double_option")]
        pub tax_group_id: Option<Option<i32>>,
        pub report_frequency: Option<ReportFrequency>,
        #[serde(default, deserialize_with = "double_option")]
        pub effective_date: Option<Option<NaiveDate>>,
        #[serde(default, deserialize_with = "double_option")]
        pub expiry_date: Option<Option<NaiveDate>>,
        #[serde(default, deserialize_with = "double_option")]
        pub description: Option<Option<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Tax {
        pub id: i32,
        pub name: String,
        pub code: String,
        pub sequence: i32,
        pub rate: f64,
        #[serde(rename = "type")]
        pub type_tax_use: TaxUse,
        pub active: bool,
        pub amount_type: AmountType,
        pub tax_category: TaxCategory,
        pub calculation_method: CalculationMethod,
        pub is_exempt: bool,
        pub exempt_reason: Option<String>,
        pub account_id: Option<i32>,
        pub account_name: Option<String>,
        pub refund_account_id: Option<i32>,
        pub refund_account_name: Option<String>,
        pub tax_group_id: Option<i32>,
        pub tax_group_name: Option<String>,
        pub report_frequency: ReportFrequency,
        pub effective_date: Option<NaiveDate>,
        pub expiry_date: Option<NaiveDate>,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TaxCompute {
        pub tax_id: Option<i32>,
        #[serde(default)]
        pub base_amount: f64,
        /// Only used by fixed taxes; defaults to 1.
        pub quantity: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaxComputed {
        pub tax_id: i32,
        /// Net base: equal to the input for exclusive taxes, the input minus
        /// the tax for inclusive ones.
        pub base_amount: f64,
        pub tax_amount: f64,
        pub total_amount: f64,
        pub calculation_method: CalculationMethod,
        pub tax_rate: f64,
    }
}

pub mod tax_group {
    use super::*;
    use crate::tax::ReportFrequency;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum VatType {
        General,
        Simplified,
        Exempt,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TaxGroupNew {
        pub name: Option<String>,
        pub code: Option<String>,
        pub is_vat_group: Option<bool>,
        pub vat_type: Option<VatType>,
        pub reporting_period: Option<ReportFrequency>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaxGroup {
        pub id: i32,
        pub name: String,
        pub code: String,
        pub is_vat_group: bool,
        pub vat_type: VatType,
        pub reporting_period: ReportFrequency,
        pub description: Option<String>,
    }
}

pub mod tax_period {
    use super::*;
    use crate::tax::ReportFrequency;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TaxPeriodState {
        Open,
        Closed,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TaxPeriodNew {
        pub name: Option<String>,
        pub date_start: Option<NaiveDate>,
        pub date_end: Option<NaiveDate>,
        pub active: Option<bool>,
        pub period_type: Option<ReportFrequency>,
        pub deadline_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaxPeriod {
        pub id: i32,
        pub name: String,
        pub date_start: NaiveDate,
        pub date_end: NaiveDate,
        pub active: bool,
        pub period_type: ReportFrequency,
        pub deadline_date: Option<NaiveDate>,
        pub state: TaxPeriodState,
    }
}

pub mod tax_report {
    use super::*;
    use crate::tax::ReportFrequency;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TaxReportState {
        Draft,
        Confirmed,
        Submitted,
    }

    /// Create body. `state` and `vat_payable` are not accepted: reports start
    /// as drafts and the payable amount is always derived.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TaxReportNew {
        pub name: Option<String>,
        pub date: Option<NaiveDate>,
        pub period_start: Option<NaiveDate>,
        pub period_end: Option<NaiveDate>,
        pub report_type: Option<ReportFrequency>,
        pub additional_period: Option<String>,
        #[serde(default)]
        pub tax_ids: Vec<i32>,
        pub sale_vat_amount: Option<f64>,
        pub purchase_vat_amount: Option<f64>,
        pub exempt_amount: Option<f64>,
        pub zero_rated_amount: Option<f64>,
        pub withholding_amount: Option<f64>,
        pub notes: Option<String>,
        pub tax_period_id: Option<i32>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TaxReportUpdate {
        pub name: Option<String>,
        pub date: Option<NaiveDate>,
        pub period_start: Option<NaiveDate>,
        pub period_end: Option<NaiveDate>,
        pub report_type: Option<ReportFrequency>,
        #[serde(default, deserialize_with = "double_option")]
        pub additional_period: Option<Option<String>>,
        pub tax_ids: Option<Vec<i32>>,
        pub sale_vat_amount: Option<f64>,
        pub purchase_vat_amount: Option<f64>,
        pub exempt_amount: Option<f64>,
        pub zero_rated_amount: Option<f64>,
        pub withholding_amount: Option<f64>,
        #[serde(default, deserialize_with = "double_option")]
        pub notes: Option<Option<String>>,
        #[serde(default, deserialize_with = "double_option")]
        pub tax_period_id: Option<Option<i32>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaxReport {
        pub id: i32,
        pub name: String,
        pub date: NaiveDate,
        pub period_start: NaiveDate,
        pub period_end: NaiveDate,
        pub tax_period_id: Option<i32>,
        pub tax_period_name: Option<String>,
        pub report_type: ReportFrequency,
        pub additional_period: Option<String>,
        pub tax_ids: Vec<i32>,
        /// Names of the linked taxes, in `tax_ids` order.
        pub selected_taxes: Vec<String>,
        pub state: TaxReportState,
        pub sale_vat_amount: f64,
        pub purchase_vat_amount: f64,
        pub vat_payable: f64,
        pub exempt_amount: f64,
        pub zero_rated_amount: f64,
        pub withholding_amount: f64,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub submitted_at: Option<DateTime<Utc>>,
    }

    /// Result of a state action (`confirm`, `submit`).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaxReportStatus {
        pub id: i32,
        pub state: TaxReportState,
        pub submitted_at: Option<DateTime<Utc>>,
    }
}

pub mod auto_journal {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AutoJournalRule {
        pub account: Option<String>,
        #[serde(default)]
        pub amount: f64,
        pub partner: Option<String>,
        pub condition: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AutoJournalRequest {
        #[serde(default)]
        pub rules: Vec<AutoJournalRule>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AutoJournalEntry {
        pub date: NaiveDate,
        #[serde(rename = "ref")]
        pub reference: String,
        pub account_name: String,
        pub amount: f64,
        pub partner_name: String,
        pub memo: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_null_differs_from_absent() {
        let cleared: account::AccountUpdate = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(cleared.parent_id, Some(None));

        let untouched: account::AccountUpdate = serde_json::from_str(r#"{"name": "Cash"}"#).unwrap();
        assert_eq!(untouched.parent_id, None);

        let set: account::AccountUpdate = serde_json::from_str(r#"{"parent_id": 4}"#).unwrap();
        assert_eq!(set.parent_id, Some(Some(4)));
    }

    #[test]
    fn tax_accepts_both_field_spellings() {
        let public: tax::TaxNew =
            serde_json::from_str(r#"{"name": "VAT", "rate": 10.0, "type": "purchase"}"#).unwrap();
        assert_eq!(public.rate, Some(10.0));
        assert_eq!(public.type_tax_use, Some(tax::TaxUse::Purchase));

        let internal: tax::TaxNew =
            serde_json::from_str(r#"{"name": "VAT", "amount": 5.0, "type_tax_use": "both"}"#)
                .unwrap();
        assert_eq!(internal.rate, Some(5.0));
        assert_eq!(internal.type_tax_use, Some(tax::TaxUse::Both));
    }

    #[test]
    fn report_state_and_payable_are_ignored_on_create() {
        let body: tax_report::TaxReportNew = serde_json::from_str(
            r#"{"name": "Q1", "state": "submitted", "vat_payable": 99, "sale_vat_amount": 10}"#,
        )
        .unwrap();
        assert_eq!(body.sale_vat_amount, Some(10.0));
        assert!(body.tax_ids.is_empty());
    }

    #[test]
    fn envelope_skips_empty_fields() {
        let json = serde_json::to_value(Envelope::message("deleted")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "deleted"}));

        let json = serde_json::to_value(Envelope::error("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));

        let json = serde_json::to_value(Envelope::data(vec![1, 2]).with_message("ok")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "data": [1, 2], "message": "ok"})
        );
    }

    #[test]
    fn journal_entry_accepts_line_ids_alias() {
        let body: journal_entry::JournalEntryNew = serde_json::from_str(
            r#"{"name": "INV", "ref": "R1", "line_ids": [{"account_id": 1, "debit": 10}]}"#,
        )
        .unwrap();
        assert_eq!(body.reference.as_deref(), Some("R1"));
        assert_eq!(body.lines.len(), 1);
        assert_eq!(body.lines[0].credit, 0.0);
    }
}
