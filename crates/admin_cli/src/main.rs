use std::{error::Error, io::Write};

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, EngineError, Money, NewTransactionCmd, NewUserCmd, TransactionFields};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "pitaka_admin")]
#[command(about = "Admin utilities for Pitaka (bootstrap users, seed data, audit balances)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./pitaka.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    /// Create a `test` user with a few sample transactions.
    Seed,
    /// Compare cached account balances with the transaction history.
    Audit(AuditArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    display_name: Option<String>,
}

#[derive(Args, Debug)]
struct AuditArgs {
    #[arg(long)]
    user: String,
}

const SEED_USER: &str = "test";
const SEED_PASSWORD: &str = "password";

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

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.chars().count() < 8 {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must be at least 8 characters.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
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

async fn seed(engine: &Engine) -> Result<(), Box<dyn Error + Send + Sync>> {
    match engine
        .create_user(NewUserCmd::new(SEED_USER, SEED_PASSWORD).display_name("Test User"))
        .await
    {
        Ok(_) => {}
        Err(EngineError::ExistingKey(_)) => {
            eprintln!("user already exists: {SEED_USER}");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    }

    let accounts = engine.list_accounts(SEED_USER).await?;
    let categories = engine.list_categories(SEED_USER).await?;
    let account = |name: &str| accounts.iter().find(|a| a.name == name).map(|a| a.id);
    let category = |name: &str| categories.iter().find(|c| c.name == name).map(|c| c.id);
    let (Some(cash), Some(bank), Some(food), Some(transport)) = (
        account("Cash Wallet"),
        account("Savings Account"),
        category("Food & Dining"),
        category("Transportation"),
    ) else {
        return Err("default accounts or categories missing".into());
    };

    let today = Utc::now().date_naive();
    let samples = [
        TransactionFields::expense(cash, 15_000, today)
            .category(food)
            .description("Lunch at Jollibee"),
        TransactionFields::expense(bank, 5_000, today)
            .category(transport)
            .description("Grab ride"),
        TransactionFields::income(bank, 2_500_000, today).description("Monthly Salary"),
    ];
    for fields in samples {
        engine
            .create_transaction(NewTransactionCmd::new(SEED_USER, fields))
            .await?;
    }

    println!("seeded user: {SEED_USER} (password: {SEED_PASSWORD})");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter("engine=warn")
        .with_writer(std::io::stderr)
        .init();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;

            let mut cmd = NewUserCmd::new(args.username.clone(), password);
            if let Some(display_name) = args.display_name {
                cmd = cmd.display_name(display_name);
            }
            match engine.create_user(cmd).await {
                Ok(username) => println!("created user: {username}"),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.username);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Seed => seed(&engine).await?,
        Command::Audit(args) => {
            let audit = engine.audit_balances(&args.user).await?;
            let accounts = engine.list_accounts(&args.user).await?;
            let mut drifted = 0;
            for entry in &audit {
                let currency = accounts
                    .iter()
                    .find(|a| a.id == entry.account_id)
                    .map(|a| a.currency)
                    .unwrap_or_default();
                let status = if entry.is_consistent() {
                    "ok".to_string()
                } else {
                    drifted += 1;
                    format!("drift {}", Money::new(entry.drift(), currency))
                };
                println!(
                    "{:<24} cached {:>16} expected {:>16}  {status}",
                    entry.name,
                    Money::new(entry.cached_balance, currency).to_string(),
                    Money::new(entry.expected_balance, currency).to_string(),
                );
            }
            if drifted > 0 {
                eprintln!("{drifted} account(s) drifted");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
