//! Conversions between the wire enums of `api_types` and the engine's stored
//! enums. Money crosses the boundary as major units.

use api_types::{
    account::AccountType as ApiAccountType,
    asset::DepreciationMethod as ApiDepreciationMethod,
    budget::BudgetState as ApiBudgetState,
    journal::JournalType as ApiJournalType,
    journal_entry::MoveState as ApiMoveState,
    partner::PartnerType as ApiPartnerType,
    tax::{
        AmountType as ApiAmountType, CalculationMethod as ApiCalculationMethod,
        ReportFrequency as ApiReportFrequency, TaxCategory as ApiTaxCategory,
        TaxUse as ApiTaxUse,
    },
    tax_group::VatType as ApiVatType,
    tax_period::TaxPeriodState as ApiTaxPeriodState,
    tax_report::TaxReportState as ApiTaxReportState,
};
use engine::{
    EngineError, Money,
    accounts::AccountType,
    assets::DepreciationMethod,
    budgets::BudgetState,
    journals::JournalType,
    moves::MoveState,
    partners::PartnerType,
    tax::{AmountType, CalculationMethod},
    tax_groups::VatType,
    tax_periods::{ReportFrequency, TaxPeriodState},
    tax_reports::TaxReportState,
    taxes::{TaxCategory, TaxUse},
};

/// Converts a major-unit amount from a request body. Non-finite or
/// out-of-range numbers are rejected, naming the offending field.
pub fn money(field: &str, value: f64) -> Result<Money, EngineError> {
    Money::try_from_major(value).map_err(|err| match err {
        EngineError::InvalidValue(reason) => EngineError::InvalidValue(format!("{field}: {reason}")),
        other => other,
    })
}

pub fn opt_money(field: &str, value: Option<f64>) -> Result<Option<Money>, EngineError> {
    value.map(|value| money(field, value)).transpose()
}

pub fn major(value: i64) -> f64 {
    Money::new(value).to_major()
}

macro_rules! enum_mapping {
    ($to_engine:ident, $to_api:ident, $api:ident, $eng:ident, [$($variant:ident),+ $(,)?]) => {
        #[allow(dead_code)]
        pub fn $to_engine(value: $api) -> $eng {
            match value {
                $($api::$variant => $eng::$variant,)+
            }
        }

        pub fn $to_api(value: $eng) -> $api {
            match value {
                $($eng::$variant => $api::$variant,)+
            }
        }
    };
}

enum_mapping!(
    account_type,
    api_account_type,
    ApiAccountType,
    AccountType,
    [Asset, Liability, Equity, Income, Expense]
);

enum_mapping!(
    journal_type,
    api_journal_type,
    ApiJournalType,
    JournalType,
    [Sale, Purchase, Cash, Bank, General]
);

enum_mapping!(
    move_state,
    api_move_state,
    ApiMoveState,
    MoveState,
    [Draft, Posted, Cancelled]
);

enum_mapping!(
    partner_type,
    api_partner_type,
    ApiPartnerType,
    PartnerType,
    [Customer, Supplier, Both]
);

enum_mapping!(
    depreciation_method,
    api_depreciation_method,
    ApiDepreciationMethod,
    DepreciationMethod,
    [Linear, Degressive]
);

enum_mapping!(
    budget_state,
    api_budget_state,
    ApiBudgetState,
    BudgetState,
    [Draft, Confirmed, Closed]
);

enum_mapping!(
    amount_type,
    api_amount_type,
    ApiAmountType,
    AmountType,
    [Percent, Fixed]
);

enum_mapping!(
    calculation_method,
    api_calculation_method,
    ApiCalculationMethod,
    CalculationMethod,
    [Exclusive, Inclusive]
);

enum_mapping!(
    tax_use,
    api_tax_use,
    ApiTaxUse,
    TaxUse,
    [Sale, Purchase, Both, None]
);

enum_mapping!(
    tax_category,
    api_tax_category,
    ApiTaxCategory,
    TaxCategory,
    [Vat, Withholding, Stamp, Customs, Other]
);

enum_mapping!(
    report_frequency,
    api_report_frequency,
    ApiReportFrequency,
    ReportFrequency,
    [Monthly, Quarterly, HalfYearly, Yearly]
);

enum_mapping!(
    vat_type,
    api_vat_type,
    ApiVatType,
    VatType,
    [General, Simplified, Exempt]
);

enum_mapping!(
    tax_period_state,
    api_tax_period_state,
    ApiTaxPeriodState,
    TaxPeriodState,
    [Open, Closed]
);

enum_mapping!(
    tax_report_state,
    api_tax_report_state,
    ApiTaxReportState,
    TaxReportState,
    [Draft, Confirmed, Submitted]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_crosses_in_major_units() {
        assert_eq!(money("amount", 12.5).unwrap().minor(), 1_250);
        assert_eq!(major(1_250), 12.5);
        assert_eq!(opt_money("amount", None).unwrap(), None);
    }

    #[test]
    fn unrepresentable_amounts_name_the_field() {
        let err = money("base_amount", 1e300).unwrap_err();
        assert!(matches!(&err, EngineError::InvalidValue(reason) if reason.starts_with("base_amount")));
        assert!(opt_money("residual_value", Some(f64::NAN)).is_err());
    }

    #[test]
    fn enums_round_trip_through_engine() {
        let frequency = api_types::tax::ReportFrequency::HalfYearly;
        assert_eq!(api_report_frequency(report_frequency(frequency)), frequency);

        let usage = api_types::tax::TaxUse::None;
        assert_eq!(api_tax_use(tax_use(usage)), usage);
    }
}
