use chrono::{Datelike, NaiveDate};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Money, NewTax, ResultEngine, TaxPatch, accounts, tax::TaxBreakdown, tax_groups,
    tax_report_taxes, taxes,
};

use super::{Engine, normalize_optional_text, now, required, required_text, today, with_tx};

const DEFAULT_RATE: f64 = 10.0;
const DEFAULT_SEQUENCE: i32 = 10;

/// A tax with the names of the records it references.
#[derive(Clone, Debug, PartialEq)]
pub struct TaxView {
    pub tax: taxes::Model,
    pub account_name: Option<String>,
    pub refund_account_name: Option<String>,
    pub tax_group_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TaxComputation {
    pub tax: taxes::Model,
    pub breakdown: TaxBreakdown,
}

fn check_rate(rate: f64) -> ResultEngine<f64> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(EngineError::InvalidValue(format!(
            "rate: must be zero or positive, got {rate}"
        )));
    }
    Ok(rate)
}

fn check_validity(effective: Option<NaiveDate>, expiry: Option<NaiveDate>) -> ResultEngine<()> {
    if let (Some(effective), Some(expiry)) = (effective, expiry)
        && expiry < effective
    {
        return Err(EngineError::InvalidValue(format!(
            "expiry_date: {expiry} is before effective_date {effective}"
        )));
    }
    Ok(())
}

impl Engine {
    /// Lists taxes by `sequence`, then id.
    pub async fn taxes(&self, include_inactive: bool) -> ResultEngine<Vec<TaxView>> {
        with_tx!(self, |db_tx| {
            let mut query = taxes::Entity::find()
                .order_by_asc(taxes::Column::Sequence)
                .order_by_asc(taxes::Column::Id);
            if !include_inactive {
                query = query.filter(taxes::Column::Active.eq(true));
            }

            let mut views = Vec::new();
            for tax in query.all(&db_tx).await? {
                views.push(Self::tax_view(&db_tx, tax).await?);
            }
            Ok(views)
        })
    }

    pub async fn tax(&self, id: i32) -> ResultEngine<TaxView> {
        with_tx!(self, |db_tx| {
            let tax = self.find_tax(&db_tx, id).await?;
            Self::tax_view(&db_tx, tax).await
        })
    }

    /// Creates a tax. Without an explicit code one is generated as
    /// `TAX{year}{seq:06}` from a per-year sequence.
    pub async fn new_tax(&self, cmd: NewTax) -> ResultEngine<TaxView> {
        let name = required_text(cmd.name.as_deref(), "name")?;
        let amount = check_rate(cmd.amount.unwrap_or(DEFAULT_RATE))?;
        check_validity(cmd.effective_date, cmd.expiry_date)?;

        with_tx!(self, |db_tx| {
            self.check_account(&db_tx, "account_id", cmd.account_id)
                .await?;
            self.check_account(&db_tx, "refund_account_id", cmd.refund_account_id)
                .await?;
            self.check_tax_group(&db_tx, "tax_group_id", cmd.tax_group_id)
                .await?;

            let code = match normalize_optional_text(cmd.code.as_deref()) {
                Some(code) => {
                    if Self::tax_code_taken(&db_tx, &code, None).await? {
                        return Err(EngineError::ExistingKey(code));
                    }
                    code
                }
                None => self.next_tax_code(&db_tx, today().year()).await?,
            };

            let stamp = now();
            let tax = taxes::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                code: ActiveValue::Set(code),
                sequence: ActiveValue::Set(cmd.sequence.unwrap_or(DEFAULT_SEQUENCE)),
                active: ActiveValue::Set(cmd.active.unwrap_or(true)),
                amount: ActiveValue::Set(amount),
                amount_type: ActiveValue::Set(cmd.amount_type.unwrap_or_default()),
                type_tax_use: ActiveValue::Set(cmd.type_tax_use.unwrap_or_default()),
                tax_category: ActiveValue::Set(cmd.tax_category.unwrap_or_default()),
                calculation_method: ActiveValue::Set(cmd.calculation_method.unwrap_or_default()),
                is_exempt: ActiveValue::Set(cmd.is_exempt.unwrap_or(false)),
                exempt_reason: ActiveValue::Set(normalize_optional_text(
                    cmd.exempt_reason.as_deref(),
                )),
                account_id: ActiveValue::Set(cmd.account_id),
                refund_account_id: ActiveValue::Set(cmd.refund_account_id),
                tax_group_id: ActiveValue::Set(cmd.tax_group_id),
                report_frequency: ActiveValue::Set(cmd.report_frequency.unwrap_or_default()),
                effective_date: ActiveValue::Set(cmd.effective_date),
                expiry_date: ActiveValue::Set(cmd.expiry_date),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
                created_at: ActiveValue::Set(stamp),
                updated_at: ActiveValue::Set(stamp),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(id = tax.id, code = %tax.code, "tax created");
            Self::tax_view(&db_tx, tax).await
        })
    }

    pub async fn update_tax(&self, id: i32, patch: TaxPatch) -> ResultEngine<TaxView> {
        with_tx!(self, |db_tx| {
            let current = self.find_tax(&db_tx, id).await?;
            let effective = patch.effective_date.unwrap_or(current.effective_date);
            let expiry = patch.expiry_date.unwrap_or(current.expiry_date);
            check_validity(effective, expiry)?;

            let mut active: taxes::ActiveModel = current.into();

            if let Some(name) = patch.name.as_deref() {
                active.name = ActiveValue::Set(required_text(Some(name), "name")?);
            }
            if let Some(code) = patch.code.as_deref() {
                let code = required_text(Some(code), "code")?;
                if Self::tax_code_taken(&db_tx, &code, Some(id)).await? {
                    return Err(EngineError::ExistingKey(code));
                }
                active.code = ActiveValue::Set(code);
            }
            if let Some(sequence) = patch.sequence {
                active.sequence = ActiveValue::Set(sequence);
            }
            if let Some(flag) = patch.active {
                active.active = ActiveValue::Set(flag);
            }
            if let Some(amount) = patch.amount {
                active.amount = ActiveValue::Set(check_rate(amount)?);
            }
            if let Some(amount_type) = patch.amount_type {
                active.amount_type = ActiveValue::Set(amount_type);
            }
            if let Some(type_tax_use) = patch.type_tax_use {
                active.type_tax_use = ActiveValue::Set(type_tax_use);
            }
            if let Some(tax_category) = patch.tax_category {
                active.tax_category = ActiveValue::Set(tax_category);
            }
            if let Some(method) = patch.calculation_method {
                active.calculation_method = ActiveValue::Set(method);
            }
            if let Some(is_exempt) = patch.is_exempt {
                active.is_exempt = ActiveValue::Set(is_exempt);
            }
            if let Some(reason) = patch.exempt_reason {
                active.exempt_reason = ActiveValue::Set(normalize_optional_text(reason.as_deref()));
            }
            if let Some(account_id) = patch.account_id {
                self.check_account(&db_tx, "account_id", account_id).await?;
                active.account_id = ActiveValue::Set(account_id);
            }
            if let Some(refund_account_id) = patch.refund_account_id {
                self.check_account(&db_tx, "refund_account_id", refund_account_id)
                    .await?;
                active.refund_account_id = ActiveValue::Set(refund_account_id);
            }
            if let Some(tax_group_id) = patch.tax_group_id {
                self.check_tax_group(&db_tx, "tax_group_id", tax_group_id)
                    .await?;
                active.tax_group_id = ActiveValue::Set(tax_group_id);
            }
            if let Some(frequency) = patch.report_frequency {
                active.report_frequency = ActiveValue::Set(frequency);
            }
            if patch.effective_date.is_some() {
                active.effective_date = ActiveValue::Set(effective);
            }
            if patch.expiry_date.is_some() {
                active.expiry_date = ActiveValue::Set(expiry);
            }
            if let Some(description) = patch.description {
                active.description =
                    ActiveValue::Set(normalize_optional_text(description.as_deref()));
            }
            active.updated_at = ActiveValue::Set(now());
            let tax = active.update(&db_tx).await?;

            tracing::info!(id, "tax updated");
            Self::tax_view(&db_tx, tax).await
        })
    }

    /// Deletes a tax and unlinks it from every report.
    pub async fn delete_tax(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.find_tax(&db_tx, id).await?;
            tax_report_taxes::Entity::delete_many()
                .filter(tax_report_taxes::Column::TaxId.eq(id))
                .exec(&db_tx)
                .await?;
            taxes::Entity::delete_by_id(id).exec(&db_tx).await?;
            tracing::info!(id, "tax deleted");
            Ok(())
        })
    }

    /// Splits `base` with the rule of the given tax. `quantity` defaults to 1.
    pub async fn compute_tax(
        &self,
        tax_id: Option<i32>,
        base: Money,
        quantity: Option<f64>,
    ) -> ResultEngine<TaxComputation> {
        let tax_id = required(tax_id, "tax_id")?;
        let quantity = quantity.unwrap_or(1.0);

        with_tx!(self, |db_tx| {
            let tax = self.find_tax(&db_tx, tax_id).await?;
            let breakdown = tax.rule().compute_all(base, quantity)?;
            Ok(TaxComputation { tax, breakdown })
        })
    }

    async fn next_tax_code(&self, db_tx: &DatabaseTransaction, year: i32) -> ResultEngine<String> {
        let prefix = format!("TAX{year}");
        loop {
            let seq = self.next_sequence(db_tx, &prefix).await?;
            let code = format!("{prefix}{seq:06}");
            if !Self::tax_code_taken(db_tx, &code, None).await? {
                return Ok(code);
            }
            tracing::debug!(%code, "generated tax code already in use, skipping");
        }
    }

    async fn tax_code_taken(
        db_tx: &DatabaseTransaction,
        code: &str,
        except_id: Option<i32>,
    ) -> ResultEngine<bool> {
        let mut query = taxes::Entity::find().filter(taxes::Column::Code.eq(code));
        if let Some(id) = except_id {
            query = query.filter(taxes::Column::Id.ne(id));
        }
        Ok(query.one(db_tx).await?.is_some())
    }

    async fn tax_view(db_tx: &DatabaseTransaction, tax: taxes::Model) -> ResultEngine<TaxView> {
        let account_name = match tax.account_id {
            Some(id) => accounts::Entity::find_by_id(id)
                .one(db_tx)
                .await?
                .map(|a| a.name),
            None => None,
        };
        let refund_account_name = match tax.refund_account_id {
            Some(id) => accounts::Entity::find_by_id(id)
                .one(db_tx)
                .await?
                .map(|a| a.name),
            None => None,
        };
        let tax_group_name = match tax.tax_group_id {
            Some(id) => tax_groups::Entity::find_by_id(id)
                .one(db_tx)
                .await?
                .map(|g| g.name),
            None => None,
        };
        Ok(TaxView {
            tax,
            account_name,
            refund_account_name,
            tax_group_name,
        })
    }
}
