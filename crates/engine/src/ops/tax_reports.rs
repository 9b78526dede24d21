use std::collections::BTreeSet;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Money, NewTaxReport, ResultEngine, TaxReportPatch, move_lines,
    moves::{self, MoveState},
    tax_periods, tax_report_taxes,
    tax_reports::{self, TaxReportState},
    taxes::{self, TaxUse},
};

use super::{
    Engine, check_date_range, normalize_optional_text, now, required_text, today, with_tx,
};

/// A tax report with its linked taxes and period.
#[derive(Clone, Debug, PartialEq)]
pub struct TaxReportView {
    pub report: tax_reports::Model,
    pub tax_ids: Vec<i32>,
    pub tax_names: Vec<String>,
    pub tax_period_name: Option<String>,
}

impl Engine {
    /// Lists tax reports, most recent report date first.
    pub async fn tax_reports(&self) -> ResultEngine<Vec<TaxReportView>> {
        with_tx!(self, |db_tx| {
            let reports = tax_reports::Entity::find()
                .order_by_desc(tax_reports::Column::Date)
                .order_by_desc(tax_reports::Column::Id)
                .all(&db_tx)
                .await?;

            let mut views = Vec::with_capacity(reports.len());
            for report in reports {
                views.push(Self::tax_report_view(&db_tx, report).await?);
            }
            Ok(views)
        })
    }

    pub async fn tax_report(&self, id: i32) -> ResultEngine<TaxReportView> {
        with_tx!(self, |db_tx| {
            let report = self.find_tax_report(&db_tx, id).await?;
            Self::tax_report_view(&db_tx, report).await
        })
    }

    /// Creates a draft report. Dates default to today and `vat_payable` is
    /// derived from the sale, purchase and withholding amounts.
    pub async fn new_tax_report(&self, cmd: NewTaxReport) -> ResultEngine<TaxReportView> {
        let name = required_text(cmd.name.as_deref(), "name")?;
        let period_start = cmd.period_start.unwrap_or_else(today);
        let period_end = cmd.period_end.unwrap_or_else(today);
        check_date_range(period_start, period_end, "tax report period")?;

        with_tx!(self, |db_tx| {
            self.check_tax_period(&db_tx, "tax_period_id", cmd.tax_period_id)
                .await?;
            let tax_ids = self.check_tax_ids(&db_tx, &cmd.tax_ids).await?;

            let stamp = now();
            let amount = |value: Option<Money>| ActiveValue::Set(value.unwrap_or(Money::ZERO).minor());
            let mut active = tax_reports::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                date: ActiveValue::Set(cmd.date.unwrap_or_else(today)),
                period_start: ActiveValue::Set(period_start),
                period_end: ActiveValue::Set(period_end),
                report_type: ActiveValue::Set(cmd.report_type.unwrap_or_default()),
                additional_period: ActiveValue::Set(normalize_optional_text(
                    cmd.additional_period.as_deref(),
                )),
                sale_vat_minor: amount(cmd.sale_vat),
                purchase_vat_minor: amount(cmd.purchase_vat),
                vat_payable_minor: ActiveValue::NotSet,
                exempt_minor: amount(cmd.exempt),
                zero_rated_minor: amount(cmd.zero_rated),
                withholding_minor: amount(cmd.withholding),
                state: ActiveValue::Set(TaxReportState::Draft),
                notes: ActiveValue::Set(normalize_optional_text(cmd.notes.as_deref())),
                tax_period_id: ActiveValue::Set(cmd.tax_period_id),
                submitted_at: ActiveValue::Set(None),
                created_at: ActiveValue::Set(stamp),
                updated_at: ActiveValue::Set(stamp),
            };
            active.recompute_vat_payable()?;
            let report = active.insert(&db_tx).await?;
            Self::link_taxes(&db_tx, report.id, &tax_ids).await?;

            tracing::info!(id = report.id, "tax report created");
            Self::tax_report_view(&db_tx, report).await
        })
    }

    /// Partially updates a report and recomputes `vat_payable`. The state is
    /// only changed through [`Engine::confirm_tax_report`] and
    /// [`Engine::submit_tax_report`].
    pub async fn update_tax_report(
        &self,
        id: i32,
        patch: TaxReportPatch,
    ) -> ResultEngine<TaxReportView> {
        with_tx!(self, |db_tx| {
            let current = self.find_tax_report(&db_tx, id).await?;
            check_date_range(
                patch.period_start.unwrap_or(current.period_start),
                patch.period_end.unwrap_or(current.period_end),
                "tax report period",
            )?;
            let mut active: tax_reports::ActiveModel = current.into();

            if let Some(name) = patch.name.as_deref() {
                active.name = ActiveValue::Set(required_text(Some(name), "name")?);
            }
            if let Some(date) = patch.date {
                active.date = ActiveValue::Set(date);
            }
            if let Some(period_start) = patch.period_start {
                active.period_start = ActiveValue::Set(period_start);
            }
            if let Some(period_end) = patch.period_end {
                active.period_end = ActiveValue::Set(period_end);
            }
            if let Some(report_type) = patch.report_type {
                active.report_type = ActiveValue::Set(report_type);
            }
            if let Some(additional_period) = patch.additional_period {
                active.additional_period =
                    ActiveValue::Set(normalize_optional_text(additional_period.as_deref()));
            }
            if let Some(value) = patch.sale_vat {
                active.sale_vat_minor = ActiveValue::Set(value.minor());
            }
            if let Some(value) = patch.purchase_vat {
                active.purchase_vat_minor = ActiveValue::Set(value.minor());
            }
            if let Some(value) = patch.exempt {
                active.exempt_minor = ActiveValue::Set(value.minor());
            }
            if let Some(value) = patch.zero_rated {
                active.zero_rated_minor = ActiveValue::Set(value.minor());
            }
            if let Some(value) = patch.withholding {
                active.withholding_minor = ActiveValue::Set(value.minor());
            }
            if let Some(notes) = patch.notes {
                active.notes = ActiveValue::Set(normalize_optional_text(notes.as_deref()));
            }
            if let Some(tax_period_id) = patch.tax_period_id {
                self.check_tax_period(&db_tx, "tax_period_id", tax_period_id)
                    .await?;
                active.tax_period_id = ActiveValue::Set(tax_period_id);
            }
            if let Some(tax_ids) = patch.tax_ids.as_deref() {
                let tax_ids = self.check_tax_ids(&db_tx, tax_ids).await?;
                tax_report_taxes::Entity::delete_many()
                    .filter(tax_report_taxes::Column::TaxReportId.eq(id))
                    .exec(&db_tx)
                    .await?;
                Self::link_taxes(&db_tx, id, &tax_ids).await?;
            }
            active.recompute_vat_payable()?;
            active.updated_at = ActiveValue::Set(now());
            let report = active.update(&db_tx).await?;

            tracing::info!(id, "tax report updated");
            Self::tax_report_view(&db_tx, report).await
        })
    }

    pub async fn delete_tax_report(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.find_tax_report(&db_tx, id).await?;
            tax_report_taxes::Entity::delete_many()
                .filter(tax_report_taxes::Column::TaxReportId.eq(id))
                .exec(&db_tx)
                .await?;
            tax_reports::Entity::delete_by_id(id).exec(&db_tx).await?;
            tracing::info!(id, "tax report deleted");
            Ok(())
        })
    }

    /// `draft -> confirmed`. Confirming a confirmed report is a no-op; a
    /// submitted report cannot go back.
    pub async fn confirm_tax_report(&self, id: i32) -> ResultEngine<tax_reports::Model> {
        with_tx!(self, |db_tx| {
            let report = self.find_tax_report(&db_tx, id).await?;
            match report.state {
                TaxReportState::Confirmed => Ok(report),
                TaxReportState::Submitted => Err(EngineError::InvalidState(format!(
                    "tax report {id} is already submitted"
                ))),
                TaxReportState::Draft => {
                    let mut active: tax_reports::ActiveModel = report.into();
                    active.state = ActiveValue::Set(TaxReportState::Confirmed);
                    active.updated_at = ActiveValue::Set(now());
                    let report = active.update(&db_tx).await?;
                    tracing::info!(id, "tax report confirmed");
                    Ok(report)
                }
            }
        })
    }

    /// Marks the report submitted and stamps `submitted_at`. Any prior state
    /// is accepted.
    pub async fn submit_tax_report(&self, id: i32) -> ResultEngine<tax_reports::Model> {
        with_tx!(self, |db_tx| {
            let report = self.find_tax_report(&db_tx, id).await?;
            if report.state == TaxReportState::Draft {
                tracing::debug!(id, "submitting a report that was never confirmed");
            }
            let stamp = now();
            let mut active: tax_reports::ActiveModel = report.into();
            active.state = ActiveValue::Set(TaxReportState::Submitted);
            active.submitted_at = ActiveValue::Set(Some(stamp));
            active.updated_at = ActiveValue::Set(stamp);
            let report = active.update(&db_tx).await?;
            tracing::info!(id, "tax report submitted");
            Ok(report)
        })
    }

    /// Fills sale VAT, purchase VAT and exempt amounts from the posted journal
    /// items of the report period.
    ///
    /// Only lines booked on a tax account count. When the report is linked to
    /// taxes, only those taxes are considered; otherwise every tax is.
    pub async fn generate_tax_report(&self, id: i32) -> ResultEngine<TaxReportView> {
        with_tx!(self, |db_tx| {
            let report = self.find_tax_report(&db_tx, id).await?;
            let linked = report.find_related(taxes::Entity).all(&db_tx).await?;
            let candidates = if linked.is_empty() {
                taxes::Entity::find()
                    .order_by_asc(taxes::Column::Id)
                    .all(&db_tx)
                    .await?
            } else {
                linked
            };

            let mut sale_vat = Money::ZERO;
            let mut purchase_vat = Money::ZERO;
            let mut exempt = Money::ZERO;
            for tax in &candidates {
                let Some(account_id) = tax.account_id else {
                    continue;
                };
                let lines = move_lines::Entity::find()
                    .inner_join(moves::Entity)
                    .filter(move_lines::Column::AccountId.eq(account_id))
                    .filter(moves::Column::State.eq(MoveState::Posted))
                    .filter(moves::Column::Date.between(report.period_start, report.period_end))
                    .all(&db_tx)
                    .await?;

                let rule = tax.rule();
                for line in &lines {
                    let amount = line.magnitude()?;
                    match tax.type_tax_use {
                        TaxUse::Sale if tax.is_exempt => exempt = exempt.try_add(amount)?,
                        TaxUse::Sale => {
                            sale_vat = sale_vat.try_add(rule.compute_tax(amount, 1.0)?)?;
                        }
                        TaxUse::Purchase => {
                            purchase_vat = purchase_vat.try_add(rule.compute_tax(amount, 1.0)?)?;
                        }
                        TaxUse::Both | TaxUse::None => {}
                    }
                }
            }

            let mut active: tax_reports::ActiveModel = report.into();
            active.sale_vat_minor = ActiveValue::Set(sale_vat.minor());
            active.purchase_vat_minor = ActiveValue::Set(purchase_vat.minor());
            active.exempt_minor = ActiveValue::Set(exempt.minor());
            active.recompute_vat_payable()?;
            active.updated_at = ActiveValue::Set(now());
            let report = active.update(&db_tx).await?;

            tracing::info!(
                id,
                sale_vat = %sale_vat,
                purchase_vat = %purchase_vat,
                exempt = %exempt,
                "tax report generated"
            );
            Self::tax_report_view(&db_tx, report).await
        })
    }

    /// Validates and de-duplicates a list of tax ids, keeping them sorted.
    async fn check_tax_ids(
        &self,
        db_tx: &DatabaseTransaction,
        tax_ids: &[i32],
    ) -> ResultEngine<Vec<i32>> {
        let unique: BTreeSet<i32> = tax_ids.iter().copied().collect();
        for &tax_id in &unique {
            self.check_tax(db_tx, "tax_ids", Some(tax_id)).await?;
        }
        Ok(unique.into_iter().collect())
    }

    async fn link_taxes(
        db_tx: &DatabaseTransaction,
        report_id: i32,
        tax_ids: &[i32],
    ) -> ResultEngine<()> {
        for &tax_id in tax_ids {
            let link = tax_report_taxes::ActiveModel {
                tax_report_id: ActiveValue::Set(report_id),
                tax_id: ActiveValue::Set(tax_id),
            };
            tax_report_taxes::Entity::insert(link)
                .exec_without_returning(db_tx)
                .await?;
        }
        Ok(())
    }

    async fn tax_report_view(
        db_tx: &DatabaseTransaction,
        report: tax_reports::Model,
    ) -> ResultEngine<TaxReportView> {
        let taxes = report
            .find_related(taxes::Entity)
            .order_by_asc(taxes::Column::Id)
            .all(db_tx)
            .await?;
        let tax_period_name = match report.tax_period_id {
            Some(period_id) => tax_periods::Entity::find_by_id(period_id)
                .one(db_tx)
                .await?
                .map(|period| period.name),
            None => None,
        };

        Ok(TaxReportView {
            tax_ids: taxes.iter().map(|tax| tax.id).collect(),
            tax_names: taxes.into_iter().map(|tax| tax.name).collect(),
            tax_period_name,
            report,
        })
    }
}
