#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{Engine, NewAccountCmd, NewUserCmd};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .hash_cost(4)
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Engine with a registered `alice`, so the default accounts exist.
pub async fn engine_with_user() -> (Engine, DatabaseConnection) {
    let (engine, db) = engine_with_db().await;
    engine
        .create_user(NewUserCmd::new("alice", "correct horse"))
        .await
        .unwrap();
    (engine, db)
}

pub async fn account_id(engine: &Engine, user_id: &str, name: &str) -> Uuid {
    engine
        .list_accounts(user_id)
        .await
        .unwrap()
        .into_iter()
        .find(|a| a.name == name)
        .map(|a| a.id)
        .unwrap_or_else(|| panic!("account {name} missing"))
}

pub async fn category_id(engine: &Engine, user_id: &str, name: &str) -> Uuid {
    engine
        .list_categories(user_id)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .map(|c| c.id)
        .unwrap_or_else(|| panic!("category {name} missing"))
}

pub async fn new_account(engine: &Engine, user_id: &str, name: &str, opening: i64) -> Uuid {
    engine
        .new_account(NewAccountCmd::new(user_id, name).opening_balance(opening))
        .await
        .unwrap()
}

pub async fn balance(engine: &Engine, user_id: &str, account_id: Uuid) -> i64 {
    engine.account(account_id, user_id).await.unwrap().balance
}

pub async fn assert_ledger_consistent(engine: &Engine, user_id: &str) {
    for entry in engine.audit_balances(user_id).await.unwrap() {
        assert!(
            entry.is_consistent(),
            "{}: cached {} expected {}",
            entry.name,
            entry.cached_balance,
            entry.expected_balance
        );
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
