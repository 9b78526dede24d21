use std::{error::Error, io::Write};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, Money, NewBudget, NewCurrency, NewJournal, journals::JournalType};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "tally_admin")]
#[command(about = "Admin utilities for Tally (bootstrap users and reference data)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./tally.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Journal(Journal),
    Currency(Currency),
    Budget(Budget),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create an API user; the password is prompted for.
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Journal {
    #[command(subcommand)]
    command: JournalCommand,
}

#[derive(Subcommand, Debug)]
enum JournalCommand {
    Create(JournalCreateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum JournalKind {
    Sale,
    Purchase,
    Cash,
    Bank,
    General,
}

impl From<JournalKind> for JournalType {
    fn from(value: JournalKind) -> Self {
        match value {
            JournalKind::Sale => JournalType::Sale,
            JournalKind::Purchase => JournalType::Purchase,
            JournalKind::Cash => JournalType::Cash,
            JournalKind::Bank => JournalType::Bank,
            JournalKind::General => JournalType::General,
        }
    }
}

#[derive(Args, Debug)]
struct JournalCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    code: String,
    #[arg(long = "type", value_enum, default_value_t = JournalKind::General)]
    kind: JournalKind,
}

#[derive(Args, Debug)]
struct Currency {
    #[command(subcommand)]
    command: CurrencyCommand,
}

#[derive(Subcommand, Debug)]
enum CurrencyCommand {
    Create(CurrencyCreateArgs),
}

#[derive(Args, Debug)]
struct CurrencyCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    code: String,
    #[arg(long)]
    symbol: Option<String>,
    /// Exchange rate against the company currency.
    #[arg(long, default_value_t = 1.0)]
    rate: f64,
}

#[derive(Args, Debug)]
struct Budget {
    #[command(subcommand)]
    command: BudgetCommand,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    Create(BudgetCreateArgs),
}

#[derive(Args, Debug)]
struct BudgetCreateArgs {
    #[arg(long)]
    name: String,
    /// First day, `YYYY-MM-DD`.
    #[arg(long)]
    start: NaiveDate,
    /// Last day, `YYYY-MM-DD`.
    #[arg(long)]
    end: NaiveDate,
    /// Planned amount, e.g. `1500.00`.
    #[arg(long, value_parser = parse_amount)]
    amount: Money,
    /// Account whose posted lines count as spent.
    #[arg(long)]
    account_id: Option<i32>,
}

fn parse_amount(raw: &str) -> Result<Money, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid amount: {raw}"))?;
    Money::try_from_major(value).map_err(|err| err.to_string())
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_new_password() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let first = prompt_password("Password: ")?;
        if first.is_empty() {
            execute!(out, Print("Password must not be empty.\r\n"))?;
            continue;
        }

        if prompt_password("Confirm password: ")? == first {
            return Ok(first);
        }
        execute!(out, Print("Passwords do not match. Try again.\r\n"))?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_new_password()?;
            engine.new_user(&args.username, &password).await?;
            println!("created user: {}", args.username);
        }
        Command::Journal(Journal {
            command: JournalCommand::Create(args),
        }) => {
            let journal = engine
                .new_journal(NewJournal::new(args.name, args.code, args.kind.into()))
                .await?;
            println!("created journal: {} ({})", journal.code, journal.id);
        }
        Command::Currency(Currency {
            command: CurrencyCommand::Create(args),
        }) => {
            let currency = engine
                .new_currency(NewCurrency {
                    name: Some(args.name),
                    code: Some(args.code),
                    symbol: args.symbol,
                    rate: Some(args.rate),
                    active: None,
                })
                .await?;
            println!("created currency: {} ({})", currency.code, currency.id);
        }
        Command::Budget(Budget {
            command: BudgetCommand::Create(args),
        }) => {
            let budget = engine
                .new_budget(NewBudget {
                    name: Some(args.name),
                    start_date: Some(args.start),
                    end_date: Some(args.end),
                    amount: Some(args.amount),
                    account_id: args.account_id,
                    state: None,
                })
                .await?;
            println!(
                "created budget: {} ({}), fiscal year {}",
                budget.budget.name,
                budget.budget.id,
                budget.fiscal_year()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn budget_arguments_parse_dates_and_amounts() {
        let cli = Cli::try_parse_from([
            "tally_admin",
            "--database-url",
            "sqlite::memory:",
            "budget",
            "create",
            "--name",
            "Office",
            "--start",
            "2025-01-01",
            "--end",
            "2025-12-31",
            "--amount",
            "1500.50",
        ])
        .unwrap();

        let Command::Budget(Budget {
            command: BudgetCommand::Create(args),
        }) = cli.command
        else {
            panic!("expected budget create");
        };
        assert_eq!(args.amount, Money::new(150_050));
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(args.account_id, None);
    }

    #[test]
    fn budget_amount_must_be_a_representable_number() {
        for amount in ["lots", "inf", "1e300"] {
            let parsed = Cli::try_parse_from([
                "tally_admin",
                "budget",
                "create",
                "--name",
                "Office",
                "--start",
                "2025-01-01",
                "--end",
                "2025-12-31",
                "--amount",
                amount,
            ]);
            assert!(parsed.is_err(), "{amount} should be rejected");
        }
    }

    #[test]
    fn journal_type_defaults_to_general() {
        let cli = Cli::try_parse_from([
            "tally_admin",
            "journal",
            "create",
            "--name",
            "Bank",
            "--code",
            "BNK",
        ])
        .unwrap();

        let Command::Journal(Journal {
            command: JournalCommand::Create(args),
        }) = cli.command
        else {
            panic!("expected journal create");
        };
        assert!(matches!(JournalType::from(args.kind), JournalType::General));
    }
}
