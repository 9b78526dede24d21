//! Accounting engine: entities, numeric helpers and the [`Engine`] service.
//!
//! Every mutating operation runs in one database transaction and stamps the
//! `updated_at` column of the rows it touches.

pub use commands::{
    AccountPatch, AssetPatch, JournalEntryPatch, NewAccount, NewAsset, NewBudget, NewCurrency,
    NewJournal, NewJournalEntry, NewMoveLine, NewPartner, NewTax, NewTaxGroup, NewTaxPeriod,
    NewTaxReport, PartnerPatch, TaxPatch, TaxReportPatch,
};
pub use error::EngineError;
pub use money::Money;
pub use ops::{
    AccountView, AssetDepreciation, BudgetView, Engine, EngineBuilder, JournalEntryView,
    MoveLineView, TaxComputation, TaxReportView, TaxView,
};

pub mod accounts;
pub mod assets;
pub mod auto_journal;
pub mod budgets;
mod commands;
pub mod currencies;
pub mod depreciation;
mod error;
pub mod journals;
mod money;
pub mod move_lines;
pub mod moves;
mod ops;
pub mod partners;
pub mod sequences;
pub mod tax;
pub mod tax_groups;
pub mod tax_periods;
pub mod tax_report_taxes;
pub mod tax_reports;
pub mod taxes;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
