use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    AssetPatch, Engine, EngineError, Money, NewAccount, NewAsset, NewJournalEntry, NewMoveLine, NewTax,
    NewTaxGroup, NewTaxPeriod, NewTaxReport, TaxPatch, TaxReportPatch,
    accounts::AccountType,
    assets::DepreciationMethod,
    moves::MoveState,
    tax::{AmountType, CalculationMethod},
    tax_periods::TaxPeriodState,
    tax_reports::TaxReportState,
    taxes::TaxUse,
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
    (engine, db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn named_tax(name: &str) -> NewTax {
    NewTax {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn tax_codes_are_generated_per_year() {
    let (engine, _db) = engine_with_db().await;
    let year = Utc::now().year();

    let first = engine.new_tax(named_tax("VAT 10")).await.unwrap();
    let second = engine.new_tax(named_tax("VAT 5")).await.unwrap();

    assert_eq!(first.tax.code, format!("TAX{year}000001"));
    assert_eq!(second.tax.code, format!("TAX{year}000002"));
    assert_eq!(first.tax.amount, 10.0);
    assert_eq!(first.tax.sequence, 10);
    assert!(first.tax.active);
    assert_eq!(first.tax.type_tax_use, TaxUse::Sale);
}

#[tokio::test]
async fn explicit_tax_code_must_be_unique() {
    let (engine, _db) = engine_with_db().await;

    engine
        .new_tax(NewTax {
            code: Some("VAT10".to_string()),
            ..named_tax("VAT 10")
        })
        .await
        .unwrap();
    let err = engine
        .new_tax(NewTax {
            code: Some("VAT10".to_string()),
            ..named_tax("Duplicate")
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("VAT10".to_string()));
}

#[tokio::test]
async fn generated_code_skips_taken_codes() {
    let (engine, _db) = engine_with_db().await;
    let year = Utc::now().year();

    engine
        .new_tax(NewTax {
            code: Some(format!("TAX{year}000001")),
            ..named_tax("Manual")
        })
        .await
        .unwrap();
    let generated = engine.new_tax(named_tax("Auto")).await.unwrap();
    assert_eq!(generated.tax.code, format!("TAX{year}000002"));
}

#[tokio::test]
async fn tax_validation_errors() {
    let (engine, _db) = engine_with_db().await;

    assert_eq!(
        engine.new_tax(NewTax::default()).await.unwrap_err(),
        EngineError::MissingField("name".to_string())
    );
    assert!(matches!(
        engine
            .new_tax(NewTax {
                amount: Some(-1.0),
                ..named_tax("Negative")
            })
            .await,
        Err(EngineError::InvalidValue(_))
    ));
    assert!(matches!(
        engine
            .new_tax(NewTax {
                effective_date: Some(date(2025, 6, 1)),
                expiry_date: Some(date(2025, 1, 1)),
                ..named_tax("Backwards")
            })
            .await,
        Err(EngineError::InvalidValue(_))
    ));
    assert!(matches!(
        engine
            .new_tax(NewTax {
                account_id: Some(404),
                ..named_tax("Dangling")
            })
            .await,
        Err(EngineError::InvalidValue(_))
    ));
}

#[tokio::test]
async fn tax_view_resolves_names_and_update_merges() {
    let (engine, _db) = engine_with_db().await;
    let account = engine
        .new_account(NewAccount::new("VAT output", "2100", AccountType::Liability))
        .await
        .unwrap();
    let group = engine
        .new_tax_group(NewTaxGroup {
            name: Some("Standard VAT".to_string()),
            code: Some("VATSTD".to_string()),
            is_vat_group: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();

    let tax = engine
        .new_tax(NewTax {
            account_id: Some(account.account.id),
            tax_group_id: Some(group.id),
            ..named_tax("VAT 10")
        })
        .await
        .unwrap();
    assert_eq!(tax.account_name.as_deref(), Some("VAT output"));
    assert_eq!(tax.tax_group_name.as_deref(), Some("Standard VAT"));
    assert_eq!(tax.refund_account_name, None);

    let updated = engine
        .update_tax(
            tax.tax.id,
            TaxPatch {
                amount: Some(7.5),
                tax_group_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.tax.amount, 7.5);
    assert_eq!(updated.tax.name, "VAT 10");
    assert_eq!(updated.tax.tax_group_id, None);
    assert_eq!(updated.account_name.as_deref(), Some("VAT output"));

    engine.delete_tax_group(group.id).await.unwrap();
    assert!(engine.tax_groups().await.unwrap().is_empty());
}

#[tokio::test]
async fn inactive_taxes_are_hidden_by_default() {
    let (engine, _db) = engine_with_db().await;
    engine.new_tax(named_tax("Live")).await.unwrap();
    engine
        .new_tax(NewTax {
            active: Some(false),
            sequence: Some(1),
            ..named_tax("Retired")
        })
        .await
        .unwrap();

    assert_eq!(engine.taxes(false).await.unwrap().len(), 1);
    let all = engine.taxes(true).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].tax.name, "Retired");
}

#[tokio::test]
async fn compute_uses_the_stored_rule() {
    let (engine, _db) = engine_with_db().await;
    let exclusive = engine.new_tax(named_tax("VAT 10")).await.unwrap();
    let inclusive = engine
        .new_tax(NewTax {
            calculation_method: Some(CalculationMethod::Inclusive),
            ..named_tax("VAT 10 incl")
        })
        .await
        .unwrap();
    let fixed = engine
        .new_tax(NewTax {
            amount: Some(2.5),
            amount_type: Some(AmountType::Fixed),
            ..named_tax("Stamp")
        })
        .await
        .unwrap();

    let out = engine
        .compute_tax(Some(exclusive.tax.id), Money::new(1_000_000), None)
        .await
        .unwrap();
    assert_eq!(out.breakdown.tax, Money::new(100_000));
    assert_eq!(out.breakdown.total, Money::new(1_100_000));

    let out = engine
        .compute_tax(Some(inclusive.tax.id), Money::new(1_100_000), None)
        .await
        .unwrap();
    assert_eq!(out.breakdown.base, Money::new(1_000_000));
    assert_eq!(out.breakdown.tax, Money::new(100_000));

    let out = engine
        .compute_tax(Some(fixed.tax.id), Money::new(10_000), Some(4.0))
        .await
        .unwrap();
    assert_eq!(out.breakdown.tax, Money::new(1_000));

    assert_eq!(
        engine
            .compute_tax(None, Money::new(100), None)
            .await
            .unwrap_err(),
        EngineError::MissingField("tax_id".to_string())
    );
    assert!(matches!(
        engine.compute_tax(Some(999), Money::new(100), None).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn compute_rejects_amounts_that_overflow() {
    let (engine, _db) = engine_with_db().await;
    let exclusive = engine.new_tax(named_tax("VAT 10")).await.unwrap();
    let stamp = engine
        .new_tax(NewTax {
            amount: Some(2.5),
            amount_type: Some(AmountType::Fixed),
            ..named_tax("Stamp")
        })
        .await
        .unwrap();

    assert!(matches!(
        engine
            .compute_tax(Some(exclusive.tax.id), Money::new(i64::MAX - 1), None)
            .await,
        Err(EngineError::InvalidValue(_))
    ));
    assert!(matches!(
        engine
            .compute_tax(Some(stamp.tax.id), Money::ZERO, Some(1e300))
            .await,
        Err(EngineError::InvalidValue(_))
    ));
}

#[tokio::test]
async fn report_vat_payable_is_derived() {
    let (engine, _db) = engine_with_db().await;

    let report = engine
        .new_tax_report(NewTaxReport {
            name: Some("Q1".to_string()),
            period_start: Some(date(2025, 1, 1)),
            period_end: Some(date(2025, 3, 31)),
            sale_vat: Some(Money::new(500_000)),
            purchase_vat: Some(Money::new(200_000)),
            withholding: Some(Money::new(50_000)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(report.report.state, TaxReportState::Draft);
    assert_eq!(report.report.vat_payable_minor, 250_000);

    let updated = engine
        .update_tax_report(
            report.report.id,
            TaxReportPatch {
                purchase_vat: Some(Money::new(600_000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.report.sale_vat_minor, 500_000);
    assert_eq!(updated.report.vat_payable_minor, -150_000);
}

#[tokio::test]
async fn report_links_taxes_without_duplicates() {
    let (engine, _db) = engine_with_db().await;
    let a = engine.new_tax(named_tax("A")).await.unwrap().tax.id;
    let b = engine.new_tax(named_tax("B")).await.unwrap().tax.id;

    let report = engine
        .new_tax_report(NewTaxReport {
            name: Some("Linked".to_string()),
            tax_ids: vec![b, a, b],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(report.tax_ids, vec![a, b]);
    assert_eq!(report.tax_names, vec!["A".to_string(), "B".to_string()]);

    let relinked = engine
        .update_tax_report(
            report.report.id,
            TaxReportPatch {
                tax_ids: Some(vec![a]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(relinked.tax_ids, vec![a]);

    engine.delete_tax(a).await.unwrap();
    let after = engine.tax_report(report.report.id).await.unwrap();
    assert!(after.tax_ids.is_empty());

    assert!(matches!(
        engine
            .new_tax_report(NewTaxReport {
                name: Some("Dangling".to_string()),
                tax_ids: vec![999],
                ..Default::default()
            })
            .await,
        Err(EngineError::InvalidValue(_))
    ));
}

#[tokio::test]
async fn report_state_machine() {
    let (engine, _db) = engine_with_db().await;
    let id = engine
        .new_tax_report(NewTaxReport {
            name: Some("Monthly".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .report
        .id;

    let confirmed = engine.confirm_tax_report(id).await.unwrap();
    assert_eq!(confirmed.state, TaxReportState::Confirmed);
    let again = engine.confirm_tax_report(id).await.unwrap();
    assert_eq!(again.state, TaxReportState::Confirmed);

    let submitted = engine.submit_tax_report(id).await.unwrap();
    assert_eq!(submitted.state, TaxReportState::Submitted);
    assert!(submitted.submitted_at.is_some());

    assert!(matches!(
        engine.confirm_tax_report(id).await,
        Err(EngineError::InvalidState(_))
    ));
    assert!(matches!(
        engine.confirm_tax_report(999).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn draft_report_can_be_submitted_directly() {
    let (engine, _db) = engine_with_db().await;
    let id = engine
        .new_tax_report(NewTaxReport {
            name: Some("Late".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .report
        .id;

    let submitted = engine.submit_tax_report(id).await.unwrap();
    assert_eq!(submitted.state, TaxReportState::Submitted);
}

#[tokio::test]
async fn generate_sums_posted_lines_on_tax_accounts() {
    let (engine, _db) = engine_with_db().await;
    let new_account = |name: &str, code: &str, account_type: AccountType| {
        NewAccount::new(name.to_string(), code.to_string(), account_type)
    };
    let sales = engine
        .new_account(new_account("Sales", "4000", AccountType::Income))
        .await
        .unwrap()
        .account
        .id;
    let purchases = engine
        .new_account(new_account("Purchases", "5000", AccountType::Expense))
        .await
        .unwrap()
        .account
        .id;
    let exports = engine
        .new_account(new_account("Exports", "4100", AccountType::Income))
        .await
        .unwrap()
        .account
        .id;
    let cash = engine
        .new_account(new_account("Cash", "1000", AccountType::Asset))
        .await
        .unwrap()
        .account
        .id;

    engine
        .new_tax(NewTax {
            account_id: Some(sales),
            ..named_tax("Output VAT")
        })
        .await
        .unwrap();
    engine
        .new_tax(NewTax {
            account_id: Some(purchases),
            type_tax_use: Some(TaxUse::Purchase),
            ..named_tax("Input VAT")
        })
        .await
        .unwrap();
    engine
        .new_tax(NewTax {
            account_id: Some(exports),
            is_exempt: Some(true),
            ..named_tax("Export exempt")
        })
        .await
        .unwrap();

    let book = |name: &str, day: NaiveDate, state: MoveState, lines: Vec<NewMoveLine>| {
        NewJournalEntry {
            name: Some(name.to_string()),
            date: Some(day),
            state: Some(state),
            lines,
            ..Default::default()
        }
    };
    engine
        .new_journal_entry(book(
            "sale",
            date(2025, 2, 10),
            MoveState::Posted,
            vec![
                NewMoveLine::debit(cash, Money::new(1_000_000)),
                NewMoveLine::credit(sales, Money::new(1_000_000)),
            ],
        ))
        .await
        .unwrap();
    engine
        .new_journal_entry(book(
            "purchase",
            date(2025, 3, 1),
            MoveState::Posted,
            vec![
                NewMoveLine::debit(purchases, Money::new(400_000)),
                NewMoveLine::credit(cash, Money::new(400_000)),
            ],
        ))
        .await
        .unwrap();
    engine
        .new_journal_entry(book(
            "export",
            date(2025, 3, 15),
            MoveState::Posted,
            vec![
                NewMoveLine::debit(cash, Money::new(250_000)),
                NewMoveLine::credit(exports, Money::new(250_000)),
            ],
        ))
        .await
        .unwrap();
    engine
        .new_journal_entry(book(
            "draft sale",
            date(2025, 3, 20),
            MoveState::Draft,
            vec![NewMoveLine::credit(sales, Money::new(9_990_000))],
        ))
        .await
        .unwrap();
    engine
        .new_journal_entry(book(
            "april sale",
            date(2025, 4, 2),
            MoveState::Posted,
            vec![NewMoveLine::credit(sales, Money::new(9_990_000))],
        ))
        .await
        .unwrap();

    let report = engine
        .new_tax_report(NewTaxReport {
            name: Some("Q1 2025".to_string()),
            period_start: Some(date(2025, 1, 1)),
            period_end: Some(date(2025, 3, 31)),
            withholding: Some(Money::new(5_000)),
            ..Default::default()
        })
        .await
        .unwrap();

    let generated = engine
        .generate_tax_report(report.report.id)
        .await
        .unwrap();
    assert_eq!(generated.report.sale_vat_minor, 100_000);
    assert_eq!(generated.report.purchase_vat_minor, 40_000);
    assert_eq!(generated.report.exempt_minor, 250_000);
    assert_eq!(generated.report.withholding_minor, 5_000);
    assert_eq!(generated.report.vat_payable_minor, 55_000);
}

#[tokio::test]
async fn tax_periods_open_and_close() {
    let (engine, _db) = engine_with_db().await;

    let period = engine
        .new_tax_period(NewTaxPeriod {
            name: Some("2025-Q1".to_string()),
            date_start: Some(date(2025, 1, 1)),
            date_end: Some(date(2025, 3, 31)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(period.state, TaxPeriodState::Open);

    let closed = engine.close_tax_period(period.id).await.unwrap();
    assert_eq!(closed.state, TaxPeriodState::Closed);
    let reopened = engine.open_tax_period(period.id).await.unwrap();
    assert_eq!(reopened.state, TaxPeriodState::Open);

    assert!(matches!(
        engine
            .new_tax_period(NewTaxPeriod {
                name: Some("reversed".to_string()),
                date_start: Some(date(2025, 3, 31)),
                date_end: Some(date(2025, 1, 1)),
                ..Default::default()
            })
            .await,
        Err(EngineError::InvalidValue(_))
    ));

    let report = engine
        .new_tax_report(NewTaxReport {
            name: Some("Q1".to_string()),
            tax_period_id: Some(period.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(report.tax_period_name.as_deref(), Some("2025-Q1"));
}

#[tokio::test]
async fn asset_codes_come_from_a_sequence() {
    let (engine, _db) = engine_with_db().await;
    let asset = |name: &str| NewAsset {
        name: Some(name.to_string()),
        purchase_date: Some(date(2024, 1, 1)),
        value: Some(Money::new(1_200_000)),
        depreciation_method: Some(DepreciationMethod::Linear),
        useful_life: Some(1),
        ..Default::default()
    };

    let first = engine.new_asset(asset("Laptop")).await.unwrap();
    let second = engine.new_asset(asset("Desk")).await.unwrap();
    assert_eq!(first.code.as_deref(), Some("00001"));
    assert_eq!(second.code.as_deref(), Some("00002"));

    assert_eq!(
        engine
            .new_asset(NewAsset {
                value: None,
                ..asset("Incomplete")
            })
            .await
            .unwrap_err(),
        EngineError::MissingField("purchase_value".to_string())
    );
}

#[tokio::test]
async fn depreciation_batch_keeps_request_positions() {
    let (engine, _db) = engine_with_db().await;
    let linear = engine
        .new_asset(NewAsset {
            name: Some("Server".to_string()),
            purchase_date: Some(date(2025, 1, 15)),
            value: Some(Money::new(1_200_000)),
            depreciation_method: Some(DepreciationMethod::Linear),
            useful_life: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    let future = engine
        .new_asset(NewAsset {
            name: Some("Van".to_string()),
            purchase_date: Some(date(2030, 1, 1)),
            value: Some(Money::new(5_000_000)),
            depreciation_method: Some(DepreciationMethod::Linear),
            useful_life: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();

    let lines = engine
        .depreciate_assets(&[999, linear.id, future.id], date(2025, 3, 20))
        .await
        .unwrap();

    let server: Vec<_> = lines.iter().filter(|l| l.asset_id == linear.id).collect();
    assert_eq!(server.len(), 3);
    assert!(server.iter().all(|l| l.line.amount == Money::new(100_000)));
    let reference = &server[0].line.journal_entry.as_ref().unwrap().reference;
    assert_eq!(reference, "JV20250115-002");

    let van: Vec<_> = lines.iter().filter(|l| l.asset_id == future.id).collect();
    assert_eq!(van.len(), 1);
    assert_eq!(van[0].line.amount, Money::ZERO);
    assert!(van[0].line.journal_entry.is_none());
    assert_eq!(van[0].line.date, date(2025, 3, 20));
}

fn laptop() -> NewAsset {
    NewAsset {
        name: Some("Laptop".to_string()),
        code: Some("LAP-1".to_string()),
        purchase_date: Some(date(2025, 1, 1)),
        value: Some(Money::new(1_200_000)),
        depreciation_method: Some(DepreciationMethod::Linear),
        useful_life: Some(5),
        residual_value: Some(Money::new(200_000)),
        ..Default::default()
    }
}

#[tokio::test]
async fn useful_life_is_bounded() {
    let (engine, _db) = engine_with_db().await;

    for years in [-1, 101, 400_000_000] {
        let err = engine
            .new_asset(NewAsset {
                useful_life: Some(years),
                ..laptop()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidValue(_)), "{years}: {err:?}");
    }
    assert!(engine.assets(true).await.unwrap().is_empty());

    let asset = engine.new_asset(laptop()).await.unwrap();
    let err = engine
        .update_asset(
            asset.id,
            AssetPatch {
                useful_life: Some(Some(400_000_000)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidValue(_)));
    assert_eq!(engine.asset(asset.id).await.unwrap().useful_life, Some(5));

    let longest = engine
        .update_asset(
            asset.id,
            AssetPatch {
                useful_life: Some(Some(100)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(longest.useful_life, Some(100));
}

#[tokio::test]
async fn asset_update_merges_and_delete_removes() {
    let (engine, _db) = engine_with_db().await;
    let asset = engine.new_asset(laptop()).await.unwrap();

    let updated = engine
        .update_asset(
            asset.id,
            AssetPatch {
                useful_life: Some(Some(3)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.useful_life, Some(3));
    assert_eq!(updated.name, asset.name);
    assert_eq!(updated.code, asset.code);
    assert_eq!(updated.purchase_date, asset.purchase_date);
    assert_eq!(updated.value_minor, asset.value_minor);
    assert_eq!(updated.residual_value_minor, asset.residual_value_minor);
    assert_eq!(updated.depreciation_method, asset.depreciation_method);
    assert!(updated.active);

    let undated = engine
        .update_asset(
            asset.id,
            AssetPatch {
                purchase_date: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(undated.purchase_date, None);
    let lines = engine
        .depreciate_assets(&[asset.id], date(2025, 6, 1))
        .await
        .unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].line.amount, Money::ZERO);
    assert_eq!(lines[0].line.reason, "purchase date missing or future");

    engine.delete_asset(asset.id).await.unwrap();
    assert!(matches!(
        engine.asset(asset.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_asset(asset.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(engine.assets(true).await.unwrap().is_empty());
}
