use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{DatabaseConnection, DatabaseTransaction, prelude::*};

use crate::{EngineError, ResultEngine};

mod accounts;
mod assets;
mod budgets;
mod currencies;
mod journal_entries;
mod journals;
mod partners;
mod sequences;
mod tax_groups;
mod tax_periods;
mod tax_reports;
mod taxes;
mod users;

pub use accounts::AccountView;
pub use assets::AssetDepreciation;
pub use budgets::BudgetView;
pub use journal_entries::{JournalEntryView, MoveLineView};
pub use tax_reports::TaxReportView;
pub use taxes::{TaxComputation, TaxView};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Generates a lookup method for an entity keyed by `i32`.
///
/// - `find`: the record, or `KeyNotFound` (404) when the id is unknown.
/// - `check`: `Ok` when the optional referenced id is absent or exists,
///   `InvalidValue` (400) otherwise.
macro_rules! impl_lookup {
    (find $fn_name:ident, $module:ident, $label:literal) => {
        pub(super) async fn $fn_name(
            &self,
            db: &DatabaseTransaction,
            id: i32,
        ) -> ResultEngine<crate::$module::Model> {
            crate::$module::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("{} {id}", $label)))
        }
    };
    (check $fn_name:ident, $module:ident, $label:literal) => {
        pub(super) async fn $fn_name(
            &self,
            db: &DatabaseTransaction,
            field: &str,
            id: Option<i32>,
        ) -> ResultEngine<()> {
            let Some(id) = id else {
                return Ok(());
            };
            if crate::$module::Entity::find_by_id(id).one(db).await?.is_none() {
                return Err(EngineError::InvalidValue(format!(
                    "{field}: {} {id} does not exist",
                    $label
                )));
            }
            Ok(())
        }
    };
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    impl_lookup!(find find_account, accounts, "account");
    impl_lookup!(find find_asset, assets, "asset");
    impl_lookup!(find find_move, moves, "journal entry");
    impl_lookup!(find find_partner, partners, "partner");
    impl_lookup!(find find_tax, taxes, "tax");
    impl_lookup!(find find_tax_group, tax_groups, "tax group");
    impl_lookup!(find find_tax_period, tax_periods, "tax period");
    impl_lookup!(find find_tax_report, tax_reports, "tax report");

    impl_lookup!(check check_account, accounts, "account");
    impl_lookup!(check check_journal, journals, "journal");
    impl_lookup!(check check_partner, partners, "partner");
    impl_lookup!(check check_tax, taxes, "tax");
    impl_lookup!(check check_tax_group, tax_groups, "tax group");
    impl_lookup!(check check_tax_period, tax_periods, "tax period");
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn required<T>(value: Option<T>, field: &str) -> ResultEngine<T> {
    value.ok_or_else(|| EngineError::MissingField(field.to_string()))
}

fn required_text(value: Option<&str>, field: &str) -> ResultEngine<String> {
    normalize_optional_text(value).ok_or_else(|| EngineError::MissingField(field.to_string()))
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn check_date_range(start: NaiveDate, end: NaiveDate, label: &str) -> ResultEngine<()> {
    if end < start {
        return Err(EngineError::InvalidValue(format!(
            "{label} ends ({end}) before it starts ({start})"
        )));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text(Some("  Cash "), "name").unwrap(), "Cash");
        assert_eq!(
            required_text(Some("   "), "name"),
            Err(EngineError::MissingField("name".to_string()))
        );
        assert_eq!(
            required_text(None, "code"),
            Err(EngineError::MissingField("code".to_string()))
        );
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(check_date_range(start, end, "budget").is_err());
        assert!(check_date_range(start, start, "budget").is_ok());
    }
}
