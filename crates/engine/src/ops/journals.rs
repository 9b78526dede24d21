use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    NewJournal, ResultEngine,
    journals::{self, DEFAULT_JOURNAL_CODE, DEFAULT_JOURNAL_NAME, JournalType},
};

use super::{Engine, now, required, required_text, with_tx};

impl Engine {
    pub async fn journals(&self, include_inactive: bool) -> ResultEngine<Vec<journals::Model>> {
        with_tx!(self, |db_tx| {
            let mut query = journals::Entity::find().order_by_asc(journals::Column::Id);
            if !include_inactive {
                query = query.filter(journals::Column::Active.eq(true));
            }
            Ok(query.all(&db_tx).await?)
        })
    }

    pub async fn new_journal(&self, cmd: NewJournal) -> ResultEngine<journals::Model> {
        let name = required_text(cmd.name.as_deref(), "name")?;
        let code = required_text(cmd.code.as_deref(), "code")?;
        let journal_type = required(cmd.journal_type, "type")?;

        with_tx!(self, |db_tx| {
            let model = Self::insert_journal(
                &db_tx,
                name,
                code,
                journal_type,
                cmd.active.unwrap_or(true),
            )
            .await?;
            tracing::info!(id = model.id, code = %model.code, "journal created");
            Ok(model)
        })
    }

    /// The journal used when an entry names none: the first journal, or a
    /// general journal created on the spot.
    pub(super) async fn default_journal(
        &self,
        db_tx: &DatabaseTransaction,
    ) -> ResultEngine<journals::Model> {
        if let Some(journal) = journals::Entity::find()
            .order_by_asc(journals::Column::Id)
            .one(db_tx)
            .await?
        {
            return Ok(journal);
        }

        let journal = Self::insert_journal(
            db_tx,
            DEFAULT_JOURNAL_NAME.to_string(),
            DEFAULT_JOURNAL_CODE.to_string(),
            JournalType::General,
            true,
        )
        .await?;
        tracing::info!(id = journal.id, "default journal created");
        Ok(journal)
    }

    async fn insert_journal(
        db_tx: &DatabaseTransaction,
        name: String,
        code: String,
        journal_type: JournalType,
        active: bool,
    ) -> ResultEngine<journals::Model> {
        let stamp = now();
        let model = journals::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name),
            code: ActiveValue::Set(code),
            journal_type: ActiveValue::Set(journal_type),
            active: ActiveValue::Set(active),
            created_at: ActiveValue::Set(stamp),
            updated_at: ActiveValue::Set(stamp),
        }
        .insert(db_tx)
        .await?;
        Ok(model)
    }
}
