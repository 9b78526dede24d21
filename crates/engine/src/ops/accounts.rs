use std::collections::HashMap;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    AccountPatch, EngineError, NewAccount, ResultEngine, accounts, budgets, move_lines, taxes,
};

use super::{Engine, now, required, required_text, with_tx};

/// An account with its parent name and direct children.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountView {
    pub account: accounts::Model,
    pub parent_name: Option<String>,
    pub child_ids: Vec<i32>,
}

impl Engine {
    /// Lists the chart of accounts ordered by code.
    pub async fn accounts(&self) -> ResultEngine<Vec<AccountView>> {
        with_tx!(self, |db_tx| {
            let models = accounts::Entity::find()
                .order_by_asc(accounts::Column::Code)
                .order_by_asc(accounts::Column::Id)
                .all(&db_tx)
                .await?;

            let names: HashMap<i32, String> =
                models.iter().map(|m| (m.id, m.name.clone())).collect();
            let mut children: HashMap<i32, Vec<i32>> = HashMap::new();
            for model in &models {
                if let Some(parent_id) = model.parent_id {
                    children.entry(parent_id).or_default().push(model.id);
                }
            }

            Ok(models
                .into_iter()
                .map(|account| AccountView {
                    parent_name: account.parent_id.and_then(|id| names.get(&id).cloned()),
                    child_ids: children.remove(&account.id).unwrap_or_default(),
                    account,
                })
                .collect())
        })
    }

    pub async fn account(&self, id: i32) -> ResultEngine<AccountView> {
        with_tx!(self, |db_tx| self.account_view(&db_tx, id).await)
    }

    pub async fn new_account(&self, cmd: NewAccount) -> ResultEngine<AccountView> {
        let name = required_text(cmd.name.as_deref(), "name")?;
        let code = required_text(cmd.code.as_deref(), "code")?;
        let account_type = required(cmd.account_type, "type")?;

        with_tx!(self, |db_tx| {
            self.check_account(&db_tx, "parent_id", cmd.parent_id)
                .await?;

            let stamp = now();
            let model = accounts::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                code: ActiveValue::Set(code),
                account_type: ActiveValue::Set(account_type),
                parent_id: ActiveValue::Set(cmd.parent_id),
                created_at: ActiveValue::Set(stamp),
                updated_at: ActiveValue::Set(stamp),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(id = model.id, code = %model.code, "account created");
            self.account_view(&db_tx, model.id).await
        })
    }

    pub async fn update_account(&self, id: i32, patch: AccountPatch) -> ResultEngine<AccountView> {
        with_tx!(self, |db_tx| {
            let current = self.find_account(&db_tx, id).await?;
            let mut active: accounts::ActiveModel = current.into();

            if let Some(name) = patch.name.as_deref() {
                active.name = ActiveValue::Set(required_text(Some(name), "name")?);
            }
            if let Some(code) = patch.code.as_deref() {
                active.code = ActiveValue::Set(required_text(Some(code), "code")?);
            }
            if let Some(account_type) = patch.account_type {
                active.account_type = ActiveValue::Set(account_type);
            }
            if let Some(parent_id) = patch.parent_id {
                if parent_id == Some(id) {
                    return Err(EngineError::InvalidValue(
                        "parent_id: an account cannot be its own parent".to_string(),
                    ));
                }
                self.check_account(&db_tx, "parent_id", parent_id).await?;
                active.parent_id = ActiveValue::Set(parent_id);
            }
            active.updated_at = ActiveValue::Set(now());
            active.update(&db_tx).await?;

            tracing::info!(id, "account updated");
            self.account_view(&db_tx, id).await
        })
    }

    /// Deletes an account together with its journal items. Children, budgets
    /// and taxes pointing at it lose the reference.
    pub async fn delete_account(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.find_account(&db_tx, id).await?;
            let stamp = now();

            move_lines::Entity::delete_many()
                .filter(move_lines::Column::AccountId.eq(id))
                .exec(&db_tx)
                .await?;
            accounts::Entity::update_many()
                .col_expr(accounts::Column::ParentId, Expr::value(Option::<i32>::None))
                .col_expr(accounts::Column::UpdatedAt, Expr::value(stamp))
                .filter(accounts::Column::ParentId.eq(id))
                .exec(&db_tx)
                .await?;
            budgets::Entity::update_many()
                .col_expr(budgets::Column::AccountId, Expr::value(Option::<i32>::None))
                .col_expr(budgets::Column::UpdatedAt, Expr::value(stamp))
                .filter(budgets::Column::AccountId.eq(id))
                .exec(&db_tx)
                .await?;
            taxes::Entity::update_many()
                .col_expr(taxes::Column::AccountId, Expr::value(Option::<i32>::None))
                .col_expr(taxes::Column::UpdatedAt, Expr::value(stamp))
                .filter(taxes::Column::AccountId.eq(id))
                .exec(&db_tx)
                .await?;
            taxes::Entity::update_many()
                .col_expr(taxes::Column::RefundAccountId, Expr::value(Option::<i32>::None))
                .col_expr(taxes::Column::UpdatedAt, Expr::value(stamp))
                .filter(taxes::Column::RefundAccountId.eq(id))
                .exec(&db_tx)
                .await?;

            accounts::Entity::delete_by_id(id).exec(&db_tx).await?;
            tracing::info!(id, "account deleted");
            Ok(())
        })
    }

    async fn account_view(&self, db_tx: &DatabaseTransaction, id: i32) -> ResultEngine<AccountView> {
        let account = self.find_account(db_tx, id).await?;
        let parent_name = match account.parent_id {
            Some(parent_id) => accounts::Entity::find_by_id(parent_id)
                .one(db_tx)
                .await?
                .map(|parent| parent.name),
            None => None,
        };
        let child_ids = accounts::Entity::find()
            .filter(accounts::Column::ParentId.eq(id))
            .order_by_asc(accounts::Column::Id)
            .all(db_tx)
            .await?
            .into_iter()
            .map(|child| child.id)
            .collect();

        Ok(AccountView {
            account,
            parent_name,
            child_ids,
        })
    }
}
