//! Initial schema: creates every table of the ledger.
//!
//! - `users`: API credentials
//! - `accounts`: chart of accounts, optionally nested
//! - `journals`: books that journal entries are posted to
//! - `partners`: customers and suppliers
//! - `moves` / `move_lines`: journal entries and their debit/credit lines
//! - `assets`: fixed assets with depreciation terms
//! - `budgets`: spending caps per account and date range
//! - `currencies`: reference currencies with a conversion rate
//! - `tax_groups`, `tax_periods`, `taxes`: tax configuration
//! - `tax_reports` / `tax_report_taxes`: VAT returns and their linked taxes
//! - `sequences`: named counters used to generate codes
//!
//! Money columns hold integer minor units and end in `_minor`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Name,
    Code,
    AccountType,
    ParentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Journals {
    Table,
    Id,
    Name,
    Code,
    JournalType,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Partners {
    Table,
    Id,
    Name,
    Code,
    PartnerType,
    Vat,
    Email,
    Phone,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Moves {
    Table,
    Id,
    Name,
    Date,
    #[iden = "ref"]
    Reference,
    JournalId,
    State,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MoveLines {
    Table,
    Id,
    MoveId,
    AccountId,
    PartnerId,
    Name,
    DebitMinor,
    CreditMinor,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Assets {
    Table,
    Id,
    Name,
    Code,
    PurchaseDate,
    ValueMinor,
    DepreciationMethod,
    UsefulLife,
    ResidualValueMinor,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    Name,
    StartDate,
    EndDate,
    AmountMinor,
    AccountId,
    State,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Currencies {
    Table,
    Id,
    Name,
    Code,
    Symbol,
    Rate,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TaxGroups {
    Table,
    Id,
    Name,
    Code,
    IsVatGroup,
    VatType,
    ReportingPeriod,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TaxPeriods {
    Table,
    Id,
    Name,
    DateStart,
    DateEnd,
    Active,
    PeriodType,
    DeadlineDate,
    State,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Taxes {
    Table,
    Id,
    Name,
    Code,
    Sequence,
    Active,
    Amount,
    AmountType,
    TypeTaxUse,
    TaxCategory,
    CalculationMethod,
    IsExempt,
    ExemptReason,
    AccountId,
    RefundAccountId,
    TaxGroupId,
    ReportFrequency,
    EffectiveDate,
    ExpiryDate,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TaxReports {
    Table,
    Id,
    Name,
    Date,
    PeriodStart,
    PeriodEnd,
    ReportType,
    AdditionalPeriod,
    SaleVatMinor,
    PurchaseVatMinor,
    VatPayableMinor,
    ExemptMinor,
    ZeroRatedMinor,
    WithholdingMinor,
    State,
    Notes,
    TaxPeriodId,
    SubmittedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TaxReportTaxes {
    Table,
    TaxReportId,
    TaxId,
}

#[derive(Iden)]
enum Sequences {
    Table,
    Prefix,
    LastValue,
    UpdatedAt,
}

fn id<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn stamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn money<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .default(0)
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(id(Accounts::Id))
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::Code).string().not_null())
                    .col(ColumnDef::new(Accounts::AccountType).string().not_null())
                    .col(ColumnDef::new(Accounts::ParentId).integer())
                    .col(stamp(Accounts::CreatedAt))
                    .col(stamp(Accounts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-accounts-parent_id")
                            .from(Accounts::Table, Accounts::ParentId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-code")
                    .table(Accounts::Table)
                    .col(Accounts::Code)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Journals
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Journals::Table)
                    .if_not_exists()
                    .col(id(Journals::Id))
                    .col(ColumnDef::new(Journals::Name).string().not_null())
                    .col(ColumnDef::new(Journals::Code).string().not_null())
                    .col(ColumnDef::new(Journals::JournalType).string().not_null())
                    .col(
                        ColumnDef::new(Journals::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(stamp(Journals::CreatedAt))
                    .col(stamp(Journals::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Partners
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Partners::Table)
                    .if_not_exists()
                    .col(id(Partners::Id))
                    .col(ColumnDef::new(Partners::Name).string().not_null())
                    .col(ColumnDef::new(Partners::Code).string())
                    .col(ColumnDef::new(Partners::PartnerType).string().not_null())
                    .col(ColumnDef::new(Partners::Vat).string())
                    .col(ColumnDef::new(Partners::Email).string())
                    .col(ColumnDef::new(Partners::Phone).string())
                    .col(
                        ColumnDef::new(Partners::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(stamp(Partners::CreatedAt))
                    .col(stamp(Partners::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Journal entries and lines
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Moves::Table)
                    .if_not_exists()
                    .col(id(Moves::Id))
                    .col(ColumnDef::new(Moves::Name).string().not_null())
                    .col(ColumnDef::new(Moves::Date).date().not_null())
                    .col(ColumnDef::new(Moves::Reference).string())
                    .col(ColumnDef::new(Moves::JournalId).integer().not_null())
                    .col(ColumnDef::new(Moves::State).string().not_null())
                    .col(stamp(Moves::CreatedAt))
                    .col(stamp(Moves::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-moves-journal_id")
                            .from(Moves::Table, Moves::JournalId)
                            .to(Journals::Table, Journals::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-moves-date")
                    .table(Moves::Table)
                    .col(Moves::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MoveLines::Table)
                    .if_not_exists()
                    .col(id(MoveLines::Id))
                    .col(ColumnDef::new(MoveLines::MoveId).integer().not_null())
                    .col(ColumnDef::new(MoveLines::AccountId).integer().not_null())
                    .col(ColumnDef::new(MoveLines::PartnerId).integer())
                    .col(ColumnDef::new(MoveLines::Name).string())
                    .col(money(MoveLines::DebitMinor))
                    .col(money(MoveLines::CreditMinor))
                    .col(stamp(MoveLines::CreatedAt))
                    .col(stamp(MoveLines::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-move_lines-move_id")
                            .from(MoveLines::Table, MoveLines::MoveId)
                            .to(Moves::Table, Moves::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-move_lines-account_id")
                            .from(MoveLines::Table, MoveLines::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-move_lines-partner_id")
                            .from(MoveLines::Table, MoveLines::PartnerId)
                            .to(Partners::Table, Partners::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-move_lines-account_id")
                    .table(MoveLines::Table)
                    .col(MoveLines::AccountId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Assets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(id(Assets::Id))
                    .col(ColumnDef::new(Assets::Name).string().not_null())
                    .col(ColumnDef::new(Assets::Code).string())
                    .col(ColumnDef::new(Assets::PurchaseDate).date())
                    .col(money(Assets::ValueMinor))
                    .col(
                        ColumnDef::new(Assets::DepreciationMethod)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assets::UsefulLife).integer())
                    .col(money(Assets::ResidualValueMinor))
                    .col(
                        ColumnDef::new(Assets::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(stamp(Assets::CreatedAt))
                    .col(stamp(Assets::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(id(Budgets::Id))
                    .col(ColumnDef::new(Budgets::Name).string().not_null())
                    .col(ColumnDef::new(Budgets::StartDate).date().not_null())
                    .col(ColumnDef::new(Budgets::EndDate).date().not_null())
                    .col(money(Budgets::AmountMinor))
                    .col(ColumnDef::new(Budgets::AccountId).integer())
                    .col(ColumnDef::new(Budgets::State).string().not_null())
                    .col(stamp(Budgets::CreatedAt))
                    .col(stamp(Budgets::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-account_id")
                            .from(Budgets::Table, Budgets::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Currencies
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Currencies::Table)
                    .if_not_exists()
                    .col(id(Currencies::Id))
                    .col(ColumnDef::new(Currencies::Name).string().not_null())
                    .col(
                        ColumnDef::new(Currencies::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Currencies::Symbol).string())
                    .col(
                        ColumnDef::new(Currencies::Rate)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(
                        ColumnDef::new(Currencies::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(stamp(Currencies::CreatedAt))
                    .col(stamp(Currencies::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Tax configuration
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TaxGroups::Table)
                    .if_not_exists()
                    .col(id(TaxGroups::Id))
                    .col(ColumnDef::new(TaxGroups::Name).string().not_null())
                    .col(ColumnDef::new(TaxGroups::Code).string().not_null())
                    .col(
                        ColumnDef::new(TaxGroups::IsVatGroup)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TaxGroups::VatType).string().not_null())
                    .col(
                        ColumnDef::new(TaxGroups::ReportingPeriod)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TaxGroups::Description).string())
                    .col(stamp(TaxGroups::CreatedAt))
                    .col(stamp(TaxGroups::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TaxPeriods::Table)
                    .if_not_exists()
                    .col(id(TaxPeriods::Id))
                    .col(ColumnDef::new(TaxPeriods::Name).string().not_null())
                    .col(ColumnDef::new(TaxPeriods::DateStart).date().not_null())
                    .col(ColumnDef::new(TaxPeriods::DateEnd).date().not_null())
                    .col(
                        ColumnDef::new(TaxPeriods::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(TaxPeriods::PeriodType).string().not_null())
                    .col(ColumnDef::new(TaxPeriods::DeadlineDate).date())
                    .col(ColumnDef::new(TaxPeriods::State).string().not_null())
                    .col(stamp(TaxPeriods::CreatedAt))
                    .col(stamp(TaxPeriods::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Taxes::Table)
                    .if_not_exists()
                    .col(id(Taxes::Id))
                    .col(ColumnDef::new(Taxes::Name).string().not_null())
                    .col(ColumnDef::new(Taxes::Code).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Taxes::Sequence)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(Taxes::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Taxes::Amount).double().not_null())
                    .col(ColumnDef::new(Taxes::AmountType).string().not_null())
                    .col(ColumnDef::new(Taxes::TypeTaxUse).string().not_null())
                    .col(ColumnDef::new(Taxes::TaxCategory).string().not_null())
                    .col(
                        ColumnDef::new(Taxes::CalculationMethod)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Taxes::IsExempt)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Taxes::ExemptReason).string())
                    .col(ColumnDef::new(Taxes::AccountId).integer())
                    .col(ColumnDef::new(Taxes::RefundAccountId).integer())
                    .col(ColumnDef::new(Taxes::TaxGroupId).integer())
                    .col(
                        ColumnDef::new(Taxes::ReportFrequency)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Taxes::EffectiveDate).date())
                    .col(ColumnDef::new(Taxes::ExpiryDate).date())
                    .col(ColumnDef::new(Taxes::Description).string())
                    .col(stamp(Taxes::CreatedAt))
                    .col(stamp(Taxes::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-taxes-account_id")
                            .from(Taxes::Table, Taxes::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-taxes-refund_account_id")
                            .from(Taxes::Table, Taxes::RefundAccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-taxes-tax_group_id")
                            .from(Taxes::Table, Taxes::TaxGroupId)
                            .to(TaxGroups::Table, TaxGroups::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 10. Tax reports
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TaxReports::Table)
                    .if_not_exists()
                    .col(id(TaxReports::Id))
                    .col(ColumnDef::new(TaxReports::Name).string().not_null())
                    .col(ColumnDef::new(TaxReports::Date).date().not_null())
                    .col(ColumnDef::new(TaxReports::PeriodStart).date().not_null())
                    .col(ColumnDef::new(TaxReports::PeriodEnd).date().not_null())
                    .col(ColumnDef::new(TaxReports::ReportType).string().not_null())
                    .col(ColumnDef::new(TaxReports::AdditionalPeriod).string())
                    .col(money(TaxReports::SaleVatMinor))
                    .col(money(TaxReports::PurchaseVatMinor))
                    .col(money(TaxReports::VatPayableMinor))
                    .col(money(TaxReports::ExemptMinor))
                    .col(money(TaxReports::ZeroRatedMinor))
                    .col(money(TaxReports::WithholdingMinor))
                    .col(ColumnDef::new(TaxReports::State).string().not_null())
                    .col(ColumnDef::new(TaxReports::Notes).string())
                    .col(ColumnDef::new(TaxReports::TaxPeriodId).integer())
                    .col(ColumnDef::new(TaxReports::SubmittedAt).timestamp_with_time_zone())
                    .col(stamp(TaxReports::CreatedAt))
                    .col(stamp(TaxReports::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tax_reports-tax_period_id")
                            .from(TaxReports::Table, TaxReports::TaxPeriodId)
                            .to(TaxPeriods::Table, TaxPeriods::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TaxReportTaxes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaxReportTaxes::TaxReportId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TaxReportTaxes::TaxId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(TaxReportTaxes::TaxReportId)
                            .col(TaxReportTaxes::TaxId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tax_report_taxes-tax_report_id")
                            .from(TaxReportTaxes::Table, TaxReportTaxes::TaxReportId)
                            .to(TaxReports::Table, TaxReports::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tax_report_taxes-tax_id")
                            .from(TaxReportTaxes::Table, TaxReportTaxes::TaxId)
                            .to(Taxes::Table, Taxes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 11. Sequences
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sequences::Prefix)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Sequences::LastValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(stamp(Sequences::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Sequences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaxReportTaxes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaxReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Taxes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaxPeriods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaxGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MoveLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Moves::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Partners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Journals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
