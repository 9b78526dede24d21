use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    NewTaxPeriod, ResultEngine,
    tax_periods::{self, TaxPeriodState},
};

use super::{Engine, check_date_range, now, required, required_text, with_tx};

impl Engine {
    pub async fn tax_periods(&self, include_inactive: bool) -> ResultEngine<Vec<tax_periods::Model>> {
        with_tx!(self, |db_tx| {
            let mut query = tax_periods::Entity::find()
                .order_by_desc(tax_periods::Column::DateStart)
                .order_by_asc(tax_periods::Column::Id);
            if !include_inactive {
                query = query.filter(tax_periods::Column::Active.eq(true));
            }
            Ok(query.all(&db_tx).await?)
        })
    }

    pub async fn new_tax_period(&self, cmd: NewTaxPeriod) -> ResultEngine<tax_periods::Model> {
        let name = required_text(cmd.name.as_deref(), "name")?;
        let date_start = required(cmd.date_start, "date_start")?;
        let date_end = required(cmd.date_end, "date_end")?;
        check_date_range(date_start, date_end, "tax period")?;

        with_tx!(self, |db_tx| {
            let stamp = now();
            let period = tax_periods::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                date_start: ActiveValue::Set(date_start),
                date_end: ActiveValue::Set(date_end),
                active: ActiveValue::Set(cmd.active.unwrap_or(true)),
                period_type: ActiveValue::Set(cmd.period_type.unwrap_or_default()),
                deadline_date: ActiveValue::Set(cmd.deadline_date),
                state: ActiveValue::Set(TaxPeriodState::Open),
                created_at: ActiveValue::Set(stamp),
                updated_at: ActiveValue::Set(stamp),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(id = period.id, "tax period created");
            Ok(period)
        })
    }

    pub async fn close_tax_period(&self, id: i32) -> ResultEngine<tax_periods::Model> {
        self.set_tax_period_state(id, TaxPeriodState::Closed).await
    }

    pub async fn open_tax_period(&self, id: i32) -> ResultEngine<tax_periods::Model> {
        self.set_tax_period_state(id, TaxPeriodState::Open).await
    }

    async fn set_tax_period_state(
        &self,
        id: i32,
        state: TaxPeriodState,
    ) -> ResultEngine<tax_periods::Model> {
        with_tx!(self, |db_tx| {
            let current = self.find_tax_period(&db_tx, id).await?;
            let mut active: tax_periods::ActiveModel = current.into();
            active.state = ActiveValue::Set(state);
            active.updated_at = ActiveValue::Set(now());
            let period = active.update(&db_tx).await?;
            tracing::info!(id, ?state, "tax period state changed");
            Ok(period)
        })
    }
}
