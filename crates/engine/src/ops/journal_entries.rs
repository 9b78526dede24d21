use std::collections::HashMap;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, JournalEntryPatch, Money, NewJournalEntry, NewMoveLine, ResultEngine, accounts,
    move_lines,
    moves::{self, MoveTotals},
    partners,
};

use super::{Engine, normalize_optional_text, now, required_text, today, with_tx};

/// A journal item with the names of the account and partner it points at.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveLineView {
    pub line: move_lines::Model,
    pub account_code: String,
    pub account_name: String,
    pub partner_code: Option<String>,
    pub partner_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct JournalEntryView {
    pub entry: moves::Model,
    pub lines: Vec<MoveLineView>,
    pub totals: MoveTotals,
}

impl JournalEntryView {
    /// `Σdebit - Σcredit` over the lines.
    pub fn amount_total(&self) -> ResultEngine<Money> {
        self.totals.amount_total()
    }
}

impl Engine {
    /// Lists journal entries, newest first.
    pub async fn journal_entries(&self) -> ResultEngine<Vec<JournalEntryView>> {
        with_tx!(self, |db_tx| {
            let entries = moves::Entity::find()
                .order_by_desc(moves::Column::Date)
                .order_by_desc(moves::Column::Id)
                .all(&db_tx)
                .await?;
            Self::entry_views(&db_tx, entries).await
        })
    }

    pub async fn journal_entry(&self, id: i32) -> ResultEngine<JournalEntryView> {
        with_tx!(self, |db_tx| self.journal_entry_view(&db_tx, id).await)
    }

    /// Creates a journal entry and its lines.
    pub async fn new_journal_entry(&self, cmd: NewJournalEntry) -> ResultEngine<JournalEntryView> {
        let name = required_text(cmd.name.as_deref(), "name")?;

        with_tx!(self, |db_tx| {
            let journal_id = match cmd.journal_id {
                Some(journal_id) => {
                    self.check_journal(&db_tx, "journal_id", Some(journal_id))
                        .await?;
                    journal_id
                }
                None => self.default_journal(&db_tx).await?.id,
            };
            self.check_lines(&db_tx, &cmd.lines).await?;

            let stamp = now();
            let entry = moves::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                date: ActiveValue::Set(cmd.date.unwrap_or_else(today)),
                reference: ActiveValue::Set(normalize_optional_text(cmd.reference.as_deref())),
                journal_id: ActiveValue::Set(journal_id),
                state: ActiveValue::Set(cmd.state.unwrap_or_default()),
                created_at: ActiveValue::Set(stamp),
                updated_at: ActiveValue::Set(stamp),
            }
            .insert(&db_tx)
            .await?;
            Self::insert_lines(&db_tx, entry.id, cmd.lines).await?;

            tracing::info!(id = entry.id, "journal entry created");
            self.journal_entry_view(&db_tx, entry.id).await
        })
    }

    /// Updates a journal entry. When `lines` is given the previous lines are
    /// replaced.
    pub async fn update_journal_entry(
        &self,
        id: i32,
        patch: JournalEntryPatch,
    ) -> ResultEngine<JournalEntryView> {
        with_tx!(self, |db_tx| {
            let current = self.find_move(&db_tx, id).await?;
            let mut active: moves::ActiveModel = current.into();

            if let Some(name) = patch.name.as_deref() {
                active.name = ActiveValue::Set(required_text(Some(name), "name")?);
            }
            if let Some(date) = patch.date {
                active.date = ActiveValue::Set(date);
            }
            if let Some(reference) = patch.reference {
                active.reference = ActiveValue::Set(normalize_optional_text(reference.as_deref()));
            }
            if let Some(journal_id) = patch.journal_id {
                self.check_journal(&db_tx, "journal_id", Some(journal_id))
                    .await?;
                active.journal_id = ActiveValue::Set(journal_id);
            }
            if let Some(state) = patch.state {
                active.state = ActiveValue::Set(state);
            }
            active.updated_at = ActiveValue::Set(now());
            active.update(&db_tx).await?;

            if let Some(lines) = patch.lines {
                self.check_lines(&db_tx, &lines).await?;
                move_lines::Entity::delete_many()
                    .filter(move_lines::Column::MoveId.eq(id))
                    .exec(&db_tx)
                    .await?;
                Self::insert_lines(&db_tx, id, lines).await?;
            }

            tracing::info!(id, "journal entry updated");
            self.journal_entry_view(&db_tx, id).await
        })
    }

    /// Deletes a journal entry and its lines.
    pub async fn delete_journal_entry(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.find_move(&db_tx, id).await?;
            move_lines::Entity::delete_many()
                .filter(move_lines::Column::MoveId.eq(id))
                .exec(&db_tx)
                .await?;
            moves::Entity::delete_by_id(id).exec(&db_tx).await?;
            tracing::info!(id, "journal entry deleted");
            Ok(())
        })
    }

    async fn check_lines(&self, db_tx: &DatabaseTransaction, lines: &[NewMoveLine]) -> ResultEngine<()> {
        for (idx, line) in lines.iter().enumerate() {
            let Some(account_id) = line.account_id else {
                return Err(EngineError::MissingField(format!("lines[{idx}].account_id")));
            };
            self.check_account(db_tx, &format!("lines[{idx}].account_id"), Some(account_id))
                .await?;
            self.check_partner(db_tx, &format!("lines[{idx}].partner_id"), line.partner_id)
                .await?;
            line.debit.try_sub(line.credit)?.try_abs()?;
        }
        MoveTotals::from_amounts(lines.iter().map(|line| (line.debit, line.credit)))?
            .amount_total()?;
        Ok(())
    }

    async fn insert_lines(
        db_tx: &DatabaseTransaction,
        move_id: i32,
        lines: Vec<NewMoveLine>,
    ) -> ResultEngine<()> {
        let stamp = now();
        for line in lines {
            let Some(account_id) = line.account_id else {
                return Err(EngineError::MissingField("account_id".to_string()));
            };
            move_lines::ActiveModel {
                id: ActiveValue::NotSet,
                move_id: ActiveValue::Set(move_id),
                account_id: ActiveValue::Set(account_id),
                partner_id: ActiveValue::Set(line.partner_id),
                name: ActiveValue::Set(normalize_optional_text(line.name.as_deref())),
                debit_minor: ActiveValue::Set(line.debit.minor()),
                credit_minor: ActiveValue::Set(line.credit.minor()),
                created_at: ActiveValue::Set(stamp),
                updated_at: ActiveValue::Set(stamp),
            }
            .insert(db_tx)
            .await?;
        }
        Ok(())
    }

    async fn journal_entry_view(
        &self,
        db_tx: &DatabaseTransaction,
        id: i32,
    ) -> ResultEngine<JournalEntryView> {
        let entry = self.find_move(db_tx, id).await?;
        let mut views = Self::entry_views(db_tx, vec![entry]).await?;
        views
            .pop()
            .ok_or_else(|| EngineError::KeyNotFound(format!("journal entry {id}")))
    }

    async fn entry_views(
        db_tx: &DatabaseTransaction,
        entries: Vec<moves::Model>,
    ) -> ResultEngine<Vec<JournalEntryView>> {
        let move_ids: Vec<i32> = entries.iter().map(|entry| entry.id).collect();
        let lines = move_lines::Entity::find()
            .filter(move_lines::Column::MoveId.is_in(move_ids))
            .order_by_asc(move_lines::Column::Id)
            .all(db_tx)
            .await?;

        let account_ids: Vec<i32> = lines.iter().map(|line| line.account_id).collect();
        let accounts: HashMap<i32, accounts::Model> = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(db_tx)
            .await?
            .into_iter()
            .map(|account| (account.id, account))
            .collect();
        let partner_ids: Vec<i32> = lines.iter().filter_map(|line| line.partner_id).collect();
        let partners: HashMap<i32, partners::Model> = partners::Entity::find()
            .filter(partners::Column::Id.is_in(partner_ids))
            .all(db_tx)
            .await?
            .into_iter()
            .map(|partner| (partner.id, partner))
            .collect();

        let mut lines_by_move: HashMap<i32, Vec<move_lines::Model>> = HashMap::new();
        for line in lines {
            lines_by_move.entry(line.move_id).or_default().push(line);
        }

        entries
            .into_iter()
            .map(|entry| -> ResultEngine<JournalEntryView> {
                let lines = lines_by_move.remove(&entry.id).unwrap_or_default();
                let totals = MoveTotals::from_lines(&lines)?;
                let lines = lines
                    .into_iter()
                    .map(|line| {
                        let account = accounts.get(&line.account_id);
                        let partner = line.partner_id.and_then(|id| partners.get(&id));
                        MoveLineView {
                            account_code: account.map(|a| a.code.clone()).unwrap_or_default(),
                            account_name: account.map(|a| a.name.clone()).unwrap_or_default(),
                            partner_code: partner.and_then(|p| p.code.clone()),
                            partner_name: partner.map(|p| p.name.clone()),
                            line,
                        }
                    })
                    .collect();
                Ok(JournalEntryView {
                    entry,
                    lines,
                    totals,
                })
            })
            .collect()
    }
}
