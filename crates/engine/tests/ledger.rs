use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection, EntityTrait};

use engine::{
    AccountPatch, Engine, EngineError, JournalEntryPatch, Money, NewAccount, NewBudget,
    NewCurrency, NewJournal, NewJournalEntry, NewMoveLine, NewPartner, PartnerPatch,
    accounts::AccountType,
    journals::{self, JournalType},
    move_lines,
    moves::MoveState,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    engine.new_user("alice", "password").await.unwrap();
    (engine, db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn account(engine: &Engine, code: &str, account_type: AccountType) -> i32 {
    engine
        .new_account(NewAccount::new(format!("Account {code}"), code, account_type))
        .await
        .unwrap()
        .account
        .id
}

#[tokio::test]
async fn account_requires_name_code_and_type() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_account(NewAccount {
            name: Some("Cash".to_string()),
            code: Some("101".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::MissingField("type".to_string()));

    let err = engine
        .new_account(NewAccount {
            name: Some("  ".to_string()),
            code: Some("101".to_string()),
            account_type: Some(AccountType::Asset),
            parent_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::MissingField("name".to_string()));
}

#[tokio::test]
async fn account_hierarchy_exposes_parent_and_children() {
    let (engine, _db) = engine_with_db().await;

    let parent = account(&engine, "100", AccountType::Asset).await;
    let child = engine
        .new_account(NewAccount::new("Petty cash", "101", AccountType::Asset).parent_id(parent))
        .await
        .unwrap();
    assert_eq!(child.parent_name.as_deref(), Some("Account 100"));

    let view = engine.account(parent).await.unwrap();
    assert_eq!(view.child_ids, vec![child.account.id]);

    let err = engine
        .new_account(NewAccount::new("Orphan", "102", AccountType::Asset).parent_id(999))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidValue(_)));

    let err = engine
        .update_account(
            parent,
            AccountPatch {
                parent_id: Some(Some(parent)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidValue(_)));
}

#[tokio::test]
async fn account_update_merges_and_clears_parent() {
    let (engine, _db) = engine_with_db().await;
    let parent = account(&engine, "100", AccountType::Asset).await;
    let child = engine
        .new_account(NewAccount::new("Bank", "102", AccountType::Asset).parent_id(parent))
        .await
        .unwrap()
        .account
        .id;

    let updated = engine
        .update_account(
            child,
            AccountPatch {
                name: Some("Main bank".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.account.name, "Main bank");
    assert_eq!(updated.account.code, "102");
    assert_eq!(updated.account.parent_id, Some(parent));

    let cleared = engine
        .update_account(
            child,
            AccountPatch {
                parent_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.account.parent_id, None);
    assert_eq!(cleared.account.name, "Main bank");
}

#[tokio::test]
async fn deleting_account_cascades_lines_and_detaches_children() {
    let (engine, db) = engine_with_db().await;
    let parent = account(&engine, "100", AccountType::Asset).await;
    let child = engine
        .new_account(NewAccount::new("Bank", "102", AccountType::Asset).parent_id(parent))
        .await
        .unwrap()
        .account
        .id;
    let revenue = account(&engine, "400", AccountType::Income).await;

    engine
        .new_journal_entry(NewJournalEntry {
            name: Some("Sale".to_string()),
            lines: vec![
                NewMoveLine::debit(parent, Money::new(10_000)),
                NewMoveLine::credit(revenue, Money::new(10_000)),
            ],
            ..Default::default()
        })
        .await
        .unwrap();

    engine.delete_account(parent).await.unwrap();

    assert!(matches!(
        engine.account(parent).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert_eq!(engine.account(child).await.unwrap().account.parent_id, None);
    let remaining = move_lines::Entity::find().all(&db).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].account_id, revenue);

    assert!(matches!(
        engine.delete_account(parent).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn journal_entry_defaults_to_general_journal() {
    let (engine, db) = engine_with_db().await;
    let cash = account(&engine, "101", AccountType::Asset).await;

    let entry = engine
        .new_journal_entry(NewJournalEntry {
            name: Some("Opening".to_string()),
            lines: vec![NewMoveLine::debit(cash, Money::new(500))],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(entry.entry.state, MoveState::Draft);
    let journals = journals::Entity::find().all(&db).await.unwrap();
    assert_eq!(journals.len(), 1);
    assert_eq!(journals[0].code, journals::DEFAULT_JOURNAL_CODE);
    assert_eq!(journals[0].journal_type, JournalType::General);
    assert_eq!(entry.entry.journal_id, journals[0].id);

    // A second entry reuses the journal instead of creating another one.
    engine
        .new_journal_entry(NewJournalEntry {
            name: Some("Second".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(journals::Entity::find().all(&db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn journal_entry_totals_are_debit_minus_credit() {
    let (engine, _db) = engine_with_db().await;
    let cash = account(&engine, "101", AccountType::Asset).await;
    let revenue = account(&engine, "400", AccountType::Income).await;
    let partner = engine
        .new_partner(NewPartner {
            name: Some("ACME".to_string()),
            code: Some("C001".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let entry = engine
        .new_journal_entry(NewJournalEntry {
            name: Some("INV/001".to_string()),
            date: Some(date(2025, 3, 10)),
            reference: Some("order 42".to_string()),
            lines: vec![
                NewMoveLine::debit(cash, Money::new(15_000)).partner_id(partner.id),
                NewMoveLine::credit(revenue, Money::new(10_000)),
            ],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(entry.totals.debit, Money::new(15_000));
    assert_eq!(entry.totals.credit, Money::new(10_000));
    assert_eq!(entry.amount_total().unwrap(), Money::new(5_000));
    assert_eq!(entry.lines[0].account_code, "101");
    assert_eq!(entry.lines[0].partner_name.as_deref(), Some("ACME"));
    assert_eq!(entry.lines[0].partner_code.as_deref(), Some("C001"));
    assert_eq!(entry.lines[1].partner_name, None);
}

#[tokio::test]
async fn journal_entry_rejects_line_without_account() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_journal_entry(NewJournalEntry {
            name: Some("Broken".to_string()),
            lines: vec![NewMoveLine {
                debit: Money::new(100),
                ..Default::default()
            }],
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::MissingField("lines[0].account_id".to_string())
    );
    assert!(engine.journal_entries().await.unwrap().is_empty());

    let err = engine
        .new_journal_entry(NewJournalEntry {
            name: Some("Broken".to_string()),
            lines: vec![NewMoveLine::debit(77, Money::new(100))],
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidValue(_)));
}

#[tokio::test]
async fn journal_entry_totals_that_overflow_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let cash = account(&engine, "101", AccountType::Asset).await;

    let err = engine
        .new_journal_entry(NewJournalEntry {
            name: Some("Too big".to_string()),
            lines: vec![
                NewMoveLine::debit(cash, Money::new(i64::MAX)),
                NewMoveLine::debit(cash, Money::new(1)),
            ],
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidValue(_)));

    let err = engine
        .new_journal_entry(NewJournalEntry {
            name: Some("Lopsided".to_string()),
            lines: vec![NewMoveLine {
                account_id: Some(cash),
                debit: Money::new(i64::MIN),
                credit: Money::new(1),
                ..Default::default()
            }],
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidValue(_)));
    assert!(engine.journal_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn journal_entry_update_replaces_lines() {
    let (engine, _db) = engine_with_db().await;
    let cash = account(&engine, "101", AccountType::Asset).await;
    let revenue = account(&engine, "400", AccountType::Income).await;

    let entry = engine
        .new_journal_entry(NewJournalEntry {
            name: Some("Draft".to_string()),
            lines: vec![NewMoveLine::debit(cash, Money::new(100))],
            ..Default::default()
        })
        .await
        .unwrap();

    let updated = engine
        .update_journal_entry(
            entry.entry.id,
            JournalEntryPatch {
                state: Some(MoveState::Posted),
                lines: Some(vec![
                    NewMoveLine::debit(cash, Money::new(300)),
                    NewMoveLine::credit(revenue, Money::new(300)),
                ]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.entry.name, "Draft");
    assert_eq!(updated.entry.state, MoveState::Posted);
    assert_eq!(updated.lines.len(), 2);
    assert_eq!(updated.amount_total().unwrap(), Money::ZERO);
}

#[tokio::test]
async fn deleting_journal_entry_removes_lines() {
    let (engine, db) = engine_with_db().await;
    let cash = account(&engine, "101", AccountType::Asset).await;
    let entry = engine
        .new_journal_entry(NewJournalEntry {
            name: Some("Temp".to_string()),
            lines: vec![NewMoveLine::debit(cash, Money::new(100))],
            ..Default::default()
        })
        .await
        .unwrap();

    engine.delete_journal_entry(entry.entry.id).await.unwrap();
    assert!(move_lines::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(matches!(
        engine.journal_entry(entry.entry.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn inactive_partner_stays_listed_and_editable() {
    let (engine, _db) = engine_with_db().await;

    let partner = engine
        .new_partner(NewPartner {
            name: Some("Dormant Ltd".to_string()),
            active: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();

    let listed = engine.partners().await.unwrap();
    assert!(listed.iter().any(|p| p.id == partner.id && !p.active));

    let fetched = engine.partner(partner.id).await.unwrap();
    assert!(!fetched.active);

    let updated = engine
        .update_partner(
            partner.id,
            PartnerPatch {
                email: Some(Some("ops@dormant.example".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email.as_deref(), Some("ops@dormant.example"));
    assert!(!updated.active);
    assert_eq!(updated.name, "Dormant Ltd");
}

#[tokio::test]
async fn deleting_partner_keeps_lines() {
    let (engine, db) = engine_with_db().await;
    let cash = account(&engine, "101", AccountType::Asset).await;
    let partner = engine
        .new_partner(NewPartner {
            name: Some("ACME".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    engine
        .new_journal_entry(NewJournalEntry {
            name: Some("Receipt".to_string()),
            lines: vec![NewMoveLine::debit(cash, Money::new(100)).partner_id(partner.id)],
            ..Default::default()
        })
        .await
        .unwrap();

    engine.delete_partner(partner.id).await.unwrap();

    let lines = move_lines::Entity::find().all(&db).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].partner_id, None);
}

#[tokio::test]
async fn journals_hide_inactive_by_default() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_journal(NewJournal::new("Sales", "SAL", JournalType::Sale))
        .await
        .unwrap();
    engine
        .new_journal(NewJournal {
            active: Some(false),
            ..NewJournal::new("Old bank", "BNK", JournalType::Bank)
        })
        .await
        .unwrap();

    assert_eq!(engine.journals(false).await.unwrap().len(), 1);
    assert_eq!(engine.journals(true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn budget_spent_counts_posted_lines_in_range() {
    let (engine, _db) = engine_with_db().await;
    let expense = account(&engine, "600", AccountType::Expense).await;
    let cash = account(&engine, "101", AccountType::Asset).await;

    let post = |name: &str, day: NaiveDate, amount: i64, state: MoveState| NewJournalEntry {
        name: Some(name.to_string()),
        date: Some(day),
        state: Some(state),
        lines: vec![
            NewMoveLine::debit(expense, Money::new(amount)),
            NewMoveLine::credit(cash, Money::new(amount)),
        ],
        ..Default::default()
    };
    engine
        .new_journal_entry(post("in range", date(2025, 2, 1), 30_000, MoveState::Posted))
        .await
        .unwrap();
    engine
        .new_journal_entry(post("draft", date(2025, 2, 2), 99_900, MoveState::Draft))
        .await
        .unwrap();
    engine
        .new_journal_entry(post("next year", date(2026, 1, 1), 50_000, MoveState::Posted))
        .await
        .unwrap();

    engine
        .new_budget(NewBudget {
            name: Some("Office 2025".to_string()),
            start_date: Some(date(2025, 1, 1)),
            end_date: Some(date(2025, 12, 31)),
            amount: Some(Money::new(100_000)),
            account_id: Some(expense),
            state: None,
        })
        .await
        .unwrap();
    engine
        .new_budget(NewBudget {
            name: Some("Unassigned".to_string()),
            start_date: Some(date(2025, 1, 1)),
            end_date: Some(date(2025, 12, 31)),
            amount: Some(Money::new(5_000)),
            ..Default::default()
        })
        .await
        .unwrap();

    let budgets = engine.budgets().await.unwrap();
    let office = budgets
        .iter()
        .find(|b| b.budget.name == "Office 2025")
        .unwrap();
    assert_eq!(office.spent, Money::new(30_000));
    assert_eq!(office.remaining().unwrap(), Money::new(70_000));
    assert_eq!(office.fiscal_year(), 2025);

    let unassigned = budgets
        .iter()
        .find(|b| b.budget.name == "Unassigned")
        .unwrap();
    assert_eq!(unassigned.spent, Money::ZERO);
    assert_eq!(unassigned.remaining().unwrap(), Money::new(5_000));
}

#[tokio::test]
async fn currency_codes_are_unique() {
    let (engine, _db) = engine_with_db().await;
    let eur = engine
        .new_currency(NewCurrency {
            name: Some("Euro".to_string()),
            code: Some("eur".to_string()),
            symbol: Some("€".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(eur.code, "EUR");
    assert_eq!(eur.rate, 1.0);

    let err = engine
        .new_currency(NewCurrency {
            name: Some("Euro again".to_string()),
            code: Some("EUR".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("EUR".to_string()));

    engine
        .new_currency(NewCurrency {
            name: Some("Old franc".to_string()),
            code: Some("FRF".to_string()),
            rate: Some(6.56),
            active: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(engine.currencies(false).await.unwrap().len(), 1);
    assert_eq!(engine.currencies(true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn users_authenticate_with_digest() {
    let (engine, _db) = engine_with_db().await;

    assert!(engine.authenticate("alice", "password").await.unwrap().is_some());
    assert!(engine.authenticate("alice", "wrong").await.unwrap().is_none());
    assert!(engine.authenticate("bob", "password").await.unwrap().is_none());
    assert_eq!(
        engine.new_user("alice", "other").await.unwrap_err(),
        EngineError::ExistingKey("alice".to_string())
    );
}
