use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, SqlErr, prelude::*, sea_query::Expr,
};

use crate::{EngineError, ResultEngine, sequences};

use super::{Engine, now};

const MAX_ATTEMPTS: usize = 8;

impl Engine {
    /// Allocates the next value of the counter named `prefix`, starting at 1.
    ///
    /// The counter row is created on first use. Updates are a compare-and-set
    /// on `last_value`, so a concurrent writer makes this attempt retry.
    pub(super) async fn next_sequence(
        &self,
        db_tx: &DatabaseTransaction,
        prefix: &str,
    ) -> ResultEngine<i64> {
        for _ in 0..MAX_ATTEMPTS {
            let current = sequences::Entity::find_by_id(prefix.to_string())
                .one(db_tx)
                .await?;

            match current {
                None => {
                    let row = sequences::ActiveModel {
                        prefix: ActiveValue::Set(prefix.to_string()),
                        last_value: ActiveValue::Set(1),
                        updated_at: ActiveValue::Set(now()),
                    };
                    match sequences::Entity::insert(row)
                        .exec_without_returning(db_tx)
                        .await
                    {
                        Ok(_) => return Ok(1),
                        Err(err)
                            if matches!(
                                err.sql_err(),
                                Some(SqlErr::UniqueConstraintViolation(_))
                            ) =>
                        {
                            tracing::debug!(prefix, "sequence row created concurrently, retrying");
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
                Some(current) => {
                    let next = current.last_value + 1;
                    let res = sequences::Entity::update_many()
                        .col_expr(sequences::Column::LastValue, Expr::value(next))
                        .col_expr(sequences::Column::UpdatedAt, Expr::value(now()))
                        .filter(sequences::Column::Prefix.eq(prefix))
                        .filter(sequences::Column::LastValue.eq(current.last_value))
                        .exec(db_tx)
                        .await?;
                    if res.rows_affected == 1 {
                        return Ok(next);
                    }
                    tracing::debug!(prefix, "sequence moved concurrently, retrying");
                }
            }
        }

        Err(EngineError::InvalidState(format!(
            "could not allocate a value for sequence {prefix}"
        )))
    }
}
