use chrono::Datelike;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Money, NewBudget, ResultEngine, budgets, move_lines,
    moves::{self, MoveState},
};

use super::{Engine, check_date_range, now, required, required_text, with_tx};

/// A budget with its consumption.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetView {
    pub budget: budgets::Model,
    /// `Σ(debit - credit)` of posted lines on the budget account within the
    /// budget dates.
    pub spent: Money,
}

impl BudgetView {
    pub fn remaining(&self) -> ResultEngine<Money> {
        Money::new(self.budget.amount_minor).try_sub(self.spent)
    }

    pub fn fiscal_year(&self) -> i32 {
        self.budget.start_date.year()
    }
}

impl Engine {
    pub async fn budgets(&self) -> ResultEngine<Vec<BudgetView>> {
        with_tx!(self, |db_tx| {
            let models = budgets::Entity::find()
                .order_by_asc(budgets::Column::StartDate)
                .order_by_asc(budgets::Column::Id)
                .all(&db_tx)
                .await?;

            let mut views = Vec::with_capacity(models.len());
            for budget in models {
                let spent = Self::budget_spent(&db_tx, &budget).await?;
                views.push(BudgetView { budget, spent });
            }
            Ok(views)
        })
    }

    pub async fn new_budget(&self, cmd: NewBudget) -> ResultEngine<BudgetView> {
        let name = required_text(cmd.name.as_deref(), "name")?;
        let start_date = required(cmd.start_date, "start_date")?;
        let end_date = required(cmd.end_date, "end_date")?;
        let amount = required(cmd.amount, "amount")?;
        check_date_range(start_date, end_date, "budget")?;

        with_tx!(self, |db_tx| {
            self.check_account(&db_tx, "account_id", cmd.account_id)
                .await?;

            let stamp = now();
            let budget = budgets::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                start_date: ActiveValue::Set(start_date),
                end_date: ActiveValue::Set(end_date),
                amount_minor: ActiveValue::Set(amount.minor()),
                account_id: ActiveValue::Set(cmd.account_id),
                state: ActiveValue::Set(cmd.state.unwrap_or_default()),
                created_at: ActiveValue::Set(stamp),
                updated_at: ActiveValue::Set(stamp),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(id = budget.id, "budget created");

            let spent = Self::budget_spent(&db_tx, &budget).await?;
            Ok(BudgetView { budget, spent })
        })
    }

    async fn budget_spent(
        db_tx: &DatabaseTransaction,
        budget: &budgets::Model,
    ) -> ResultEngine<Money> {
        let Some(account_id) = budget.account_id else {
            return Ok(Money::ZERO);
        };

        let lines = move_lines::Entity::find()
            .inner_join(moves::Entity)
            .filter(move_lines::Column::AccountId.eq(account_id))
            .filter(moves::Column::State.eq(MoveState::Posted))
            .filter(moves::Column::Date.between(budget.start_date, budget.end_date))
            .all(db_tx)
            .await?;
        lines
            .iter()
            .try_fold(Money::ZERO, |spent, line| spent.try_add(line.balance()?))
    }
}
