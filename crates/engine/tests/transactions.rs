mod common;

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement, TransactionTrait};
use tokio::task::JoinSet;
use uuid::Uuid;

use common::{
    account_id, assert_ledger_consistent, balance, category_id, day, engine_with_user,
    new_account,
};
use engine::{
    Effect, EngineError, LedgerStore, MAX_AMOUNT_MINOR, NewAccountCmd, NewTransactionCmd,
    Transaction, TransactionFields, TransactionKind, TransactionSnapshot, UpdateTransactionCmd,
    reconcile,
};

#[tokio::test]
async fn expense_edit_and_delete_walk_the_balance() {
    let (engine, _db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 10_000).await;

    let tx_id = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::expense(a, 2_500, day(2026, 2, 11)),
        ))
        .await
        .unwrap();
    assert_eq!(balance(&engine, "alice", a).await, 7_500);

    engine
        .update_transaction(UpdateTransactionCmd::new(
            "alice",
            tx_id,
            TransactionFields::expense(a, 4_000, day(2026, 2, 11)),
        ))
        .await
        .unwrap();
    assert_eq!(balance(&engine, "alice", a).await, 6_000);

    engine.delete_transaction(tx_id, "alice").await.unwrap();
    assert_eq!(balance(&engine, "alice", a).await, 10_000);
    assert_ledger_consistent(&engine, "alice").await;
}

#[tokio::test]
async fn identity_update_leaves_balances_unchanged() {
    let (engine, _db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 10_000).await;
    let b = new_account(&engine, "alice", "Wallet B", 0).await;
    let fields = TransactionFields::transfer(a, b, 3_000, day(2026, 2, 11)).description("rent");

    let tx_id = engine
        .create_transaction(NewTransactionCmd::new("alice", fields.clone()))
        .await
        .unwrap();
    let before = (
        balance(&engine, "alice", a).await,
        balance(&engine, "alice", b).await,
    );

    let updated = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx_id, fields))
        .await
        .unwrap();

    assert_eq!(updated.description.as_deref(), Some("rent"));
    assert_eq!(
        (
            balance(&engine, "alice", a).await,
            balance(&engine, "alice", b).await
        ),
        before
    );
    assert_eq!(before, (7_000, 3_000));
}

#[tokio::test]
async fn create_then_delete_restores_every_kind() {
    let (engine, _db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 1_000).await;
    let b = new_account(&engine, "alice", "Wallet B", 2_000).await;

    for fields in [
        TransactionFields::income(a, 700, day(2026, 2, 1)),
        TransactionFields::expense(a, 700, day(2026, 2, 1)),
        TransactionFields::transfer(a, b, 700, day(2026, 2, 1)),
    ] {
        let tx_id = engine
            .create_transaction(NewTransactionCmd::new("alice", fields))
            .await
            .unwrap();
        engine.delete_transaction(tx_id, "alice").await.unwrap();

        assert_eq!(balance(&engine, "alice", a).await, 1_000);
        assert_eq!(balance(&engine, "alice", b).await, 2_000);
    }
}

#[tokio::test]
async fn expense_turned_income_swings_by_twice_the_amount() {
    let (engine, _db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 5_000).await;

    let tx_id = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::expense(a, 100, day(2026, 2, 11)),
        ))
        .await
        .unwrap();
    assert_eq!(balance(&engine, "alice", a).await, 4_900);

    engine
        .update_transaction(UpdateTransactionCmd::new(
            "alice",
            tx_id,
            TransactionFields::income(a, 100, day(2026, 2, 11)),
        ))
        .await
        .unwrap();

    assert_eq!(balance(&engine, "alice", a).await, 5_100);
    assert_ledger_consistent(&engine, "alice").await;
}

#[tokio::test]
async fn transfer_destination_change_moves_the_credit() {
    let (engine, _db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 10_000).await;
    let b = new_account(&engine, "alice", "Wallet B", 1_000).await;
    let c = new_account(&engine, "alice", "Wallet C", 2_000).await;

    let tx_id = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::transfer(a, b, 500, day(2026, 2, 11)),
        ))
        .await
        .unwrap();
    assert_eq!(balance(&engine, "alice", b).await, 1_500);

    engine
        .update_transaction(UpdateTransactionCmd::new(
            "alice",
            tx_id,
            TransactionFields::transfer(a, c, 500, day(2026, 2, 11)),
        ))
        .await
        .unwrap();

    assert_eq!(balance(&engine, "alice", a).await, 9_500);
    assert_eq!(balance(&engine, "alice", b).await, 1_000);
    assert_eq!(balance(&engine, "alice", c).await, 2_500);
    assert_ledger_consistent(&engine, "alice").await;
}

#[tokio::test]
async fn source_account_change_moves_the_debit() {
    let (engine, _db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 10_000).await;
    let b = new_account(&engine, "alice", "Wallet B", 10_000).await;

    let tx_id = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::expense(a, 1_200, day(2026, 2, 11)),
        ))
        .await
        .unwrap();

    engine
        .update_transaction(UpdateTransactionCmd::new(
            "alice",
            tx_id,
            TransactionFields::expense(b, 1_500, day(2026, 2, 12)),
        ))
        .await
        .unwrap();

    assert_eq!(balance(&engine, "alice", a).await, 10_000);
    assert_eq!(balance(&engine, "alice", b).await, 8_500);
}

#[tokio::test]
async fn transfer_with_detached_destination_only_touches_source() {
    let (engine, _db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 10_000).await;
    let b = new_account(&engine, "alice", "Wallet B", 0).await;

    let tx_id = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::transfer(a, b, 500, day(2026, 2, 11)),
        ))
        .await
        .unwrap();

    engine.delete_account(b, "alice").await.unwrap();
    let tx = engine.transaction(tx_id, "alice").await.unwrap();
    assert_eq!(tx.kind, TransactionKind::Transfer);
    assert_eq!(tx.destination_account_id, None);
    assert_eq!(balance(&engine, "alice", a).await, 9_500);
    assert_ledger_consistent(&engine, "alice").await;

    engine
        .update_transaction(UpdateTransactionCmd::new(
            "alice",
            tx_id,
            TransactionFields::expense(a, 800, day(2026, 2, 11)),
        ))
        .await
        .unwrap();
    assert_eq!(balance(&engine, "alice", a).await, 9_200);

    engine.delete_transaction(tx_id, "alice").await.unwrap();
    assert_eq!(balance(&engine, "alice", a).await, 10_000);
}

#[tokio::test]
async fn missing_destination_leaves_no_row_and_no_balance_change() {
    let (engine, _db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 10_000).await;

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::transfer(a, Uuid::new_v4(), 500, day(2026, 2, 11)),
        ))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::KeyNotFound("account not exists".to_string())
    );
    assert_eq!(balance(&engine, "alice", a).await, 10_000);
    assert!(
        engine
            .list_transactions("alice", None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn forward_application_failure_rolls_back_partial_effects() {
    let (engine, db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 10_000).await;
    let ghost = Uuid::new_v4();
    let tx = Transaction {
        id: Uuid::new_v4(),
        user_id: "alice".to_string(),
        kind: TransactionKind::Transfer,
        account_id: a,
        destination_account_id: Some(ghost),
        category_id: None,
        amount_minor: 500,
        description: None,
        date: day(2026, 2, 11),
        created_at: Utc::now(),
    };

    {
        let db_tx = db.begin().await.unwrap();
        let err = reconcile::on_transaction_created(&LedgerStore::new(&db_tx), &tx)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::MissingAccount(ghost));
        // Dropped without commit.
    }

    assert_eq!(balance(&engine, "alice", a).await, 10_000);
}

#[tokio::test]
async fn reversal_against_vanished_account_is_skipped_and_reported() {
    let (engine, db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 10_000).await;
    let ghost = Uuid::new_v4();
    let tx = Transaction {
        id: Uuid::new_v4(),
        user_id: "alice".to_string(),
        kind: TransactionKind::Transfer,
        account_id: a,
        destination_account_id: Some(ghost),
        category_id: None,
        amount_minor: 500,
        description: None,
        date: day(2026, 2, 11),
        created_at: Utc::now(),
    };

    let report = reconcile::on_transaction_deleted(&LedgerStore::new(&db), &tx)
        .await
        .unwrap();

    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].account_id, a);
    assert_eq!(report.applied[0].delta, 500);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].account_id, ghost);
    assert_eq!(balance(&engine, "alice", a).await, 10_500);
}

#[tokio::test]
async fn write_path_normalizes_fields() {
    let (engine, _db) = engine_with_user().await;
    let a = account_id(&engine, "alice", "Cash Wallet").await;
    let b = account_id(&engine, "alice", "Savings Account").await;
    let food = category_id(&engine, "alice", "Food & Dining").await;

    let expense_id = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::expense(a, 15_000, day(2026, 2, 11))
                .destination(b)
                .category(food)
                .description("   "),
        ))
        .await
        .unwrap();
    let expense = engine.transaction(expense_id, "alice").await.unwrap();
    assert_eq!(expense.destination_account_id, None);
    assert_eq!(expense.category_id, Some(food));
    assert_eq!(expense.description, None);
    assert_eq!(balance(&engine, "alice", b).await, 0);

    let transfer_id = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::transfer(a, b, 1_000, day(2026, 2, 11))
                .category(food)
                .description("  to savings "),
        ))
        .await
        .unwrap();
    let transfer = engine.transaction(transfer_id, "alice").await.unwrap();
    assert_eq!(transfer.category_id, None);
    assert_eq!(transfer.description.as_deref(), Some("to savings"));
}

#[tokio::test]
async fn invalid_transactions_are_rejected() {
    let (engine, _db) = engine_with_user().await;
    let a = account_id(&engine, "alice", "Cash Wallet").await;
    let date = day(2026, 2, 11);

    let zero = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::expense(a, 0, date),
        ))
        .await;
    assert!(matches!(zero, Err(EngineError::InvalidAmount(_))));

    let no_destination = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::new(TransactionKind::Transfer, a, 100, date),
        ))
        .await;
    assert!(matches!(
        no_destination,
        Err(EngineError::InvalidTransaction(_))
    ));

    let self_transfer = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::transfer(a, a, 100, date),
        ))
        .await;
    assert!(matches!(
        self_transfer,
        Err(EngineError::InvalidTransaction(_))
    ));

    let long = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::expense(a, 100, date).description("x".repeat(256)),
        ))
        .await;
    assert!(matches!(long, Err(EngineError::InvalidName(_))));

    assert_eq!(balance(&engine, "alice", a).await, 0);
}

#[tokio::test]
async fn other_users_rows_are_invisible() {
    let (engine, _db) = engine_with_user().await;
    engine
        .create_user(engine::NewUserCmd::new("bob", "hunter2hunter2"))
        .await
        .unwrap();
    let alice_cash = account_id(&engine, "alice", "Cash Wallet").await;
    let bob_cash = account_id(&engine, "bob", "Cash Wallet").await;

    let cross = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::transfer(alice_cash, bob_cash, 100, day(2026, 2, 11)),
        ))
        .await;
    assert_eq!(
        cross.unwrap_err(),
        EngineError::KeyNotFound("account not exists".to_string())
    );

    let tx_id = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::expense(alice_cash, 100, day(2026, 2, 11)),
        ))
        .await
        .unwrap();
    assert!(matches!(
        engine.delete_transaction(tx_id, "bob").await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.transaction(tx_id, "bob").await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert_eq!(balance(&engine, "alice", alice_cash).await, -100);
}

#[tokio::test]
async fn listing_is_newest_first() {
    let (engine, _db) = engine_with_user().await;
    let a = account_id(&engine, "alice", "Cash Wallet").await;

    let older = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::expense(a, 100, day(2026, 2, 1)),
        ))
        .await
        .unwrap();
    let first_same_day = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::expense(a, 200, day(2026, 2, 5)),
        ))
        .await
        .unwrap();
    let second_same_day = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::income(a, 300, day(2026, 2, 5)),
        ))
        .await
        .unwrap();

    let ids: Vec<Uuid> = engine
        .list_transactions("alice", None)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![second_same_day, first_same_day, older]);

    let limited = engine.list_transactions("alice", Some(1)).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, second_same_day);
}

fn transfer(account_id: Uuid, destination: Uuid, amount_minor: i64) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        user_id: "alice".to_string(),
        kind: TransactionKind::Transfer,
        account_id,
        destination_account_id: Some(destination),
        category_id: None,
        amount_minor,
        description: None,
        date: day(2026, 2, 11),
        created_at: Utc::now(),
    }
}

async fn force_balance(db: &DatabaseConnection, account_id: Uuid, value: i64) {
    db.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "UPDATE accounts SET balance = ? WHERE id = ?",
        vec![value.into(), account_id.into()],
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn update_skips_reversal_against_vanished_previous_destination() {
    let (engine, db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 10_000).await;
    let b = new_account(&engine, "alice", "Wallet B", 1_000).await;
    let ghost = Uuid::new_v4();

    let previous = TransactionSnapshot {
        kind: TransactionKind::Transfer,
        account_id: a,
        destination_account_id: Some(ghost),
        amount_minor: 500,
    };
    let mut current = transfer(b, a, 300);
    current.kind = TransactionKind::Expense;
    current.destination_account_id = None;

    let report = reconcile::on_transaction_updated(&LedgerStore::new(&db), &current, &previous)
        .await
        .unwrap();

    assert_eq!(
        report.skipped,
        vec![Effect {
            account_id: ghost,
            delta: -500
        }]
    );
    assert_eq!(
        report.applied,
        vec![
            Effect {
                account_id: a,
                delta: 500
            },
            Effect {
                account_id: b,
                delta: -300
            },
        ]
    );
    assert_eq!(balance(&engine, "alice", a).await, 10_500);
    assert_eq!(balance(&engine, "alice", b).await, 700);
}

#[tokio::test]
async fn update_onto_missing_account_rolls_back_the_reversal() {
    let (engine, db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 10_000).await;
    let b = new_account(&engine, "alice", "Wallet B", 1_000).await;
    let ghost = Uuid::new_v4();

    let previous = transfer(a, b, 500).snapshot();
    let current = transfer(a, ghost, 400);

    {
        let db_tx = db.begin().await.unwrap();
        let err = reconcile::on_transaction_updated(&LedgerStore::new(&db_tx), &current, &previous)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::MissingAccount(ghost));
        // Dropped without commit.
    }

    assert_eq!(balance(&engine, "alice", a).await, 10_000);
    assert_eq!(balance(&engine, "alice", b).await, 1_000);
}

#[tokio::test]
async fn amounts_above_the_limit_are_rejected() {
    let (engine, _db) = engine_with_user().await;
    let a = account_id(&engine, "alice", "Cash Wallet").await;

    let too_big = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::income(a, MAX_AMOUNT_MINOR + 1, day(2026, 2, 11)),
        ))
        .await;
    assert!(matches!(too_big, Err(EngineError::InvalidAmount(_))));

    for opening in [MAX_AMOUNT_MINOR + 1, -MAX_AMOUNT_MINOR - 1, i64::MAX] {
        let account = engine
            .new_account(NewAccountCmd::new("alice", "Huge").opening_balance(opening))
            .await;
        assert!(matches!(account, Err(EngineError::InvalidAmount(_))));
    }

    engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::income(a, MAX_AMOUNT_MINOR, day(2026, 2, 11)),
        ))
        .await
        .unwrap();
    assert_eq!(balance(&engine, "alice", a).await, MAX_AMOUNT_MINOR);
}

#[tokio::test]
async fn balance_overflow_rolls_back_and_keeps_the_account_readable() {
    let (engine, db) = engine_with_user().await;
    let big = new_account(&engine, "alice", "Big", MAX_AMOUNT_MINOR).await;
    let low = new_account(&engine, "alice", "Low", -MAX_AMOUNT_MINOR).await;
    force_balance(&db, big, i64::MAX - 10).await;
    force_balance(&db, low, i64::MIN + 10).await;

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::income(big, 100, day(2026, 2, 11)),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Concurrency(_)));

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionFields::expense(low, 100, day(2026, 2, 11)),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Concurrency(_)));

    assert_eq!(balance(&engine, "alice", big).await, i64::MAX - 10);
    assert_eq!(balance(&engine, "alice", low).await, i64::MIN + 10);
    assert!(
        engine
            .list_transactions("alice", None)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(engine.audit_balances("alice").await.unwrap().len(), 5);

    let store = LedgerStore::new(&db);
    store.adjust_balance(big, 10).await.unwrap();
    assert_eq!(balance(&engine, "alice", big).await, i64::MAX);
    assert!(matches!(
        store.adjust_balance(big, 1).await,
        Err(EngineError::Concurrency(_))
    ));
    let ghost = Uuid::new_v4();
    assert_eq!(
        store.adjust_balance(ghost, 1).await,
        Err(EngineError::MissingAccount(ghost))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adjustments_do_not_lose_updates() {
    let (engine, db) = engine_with_user().await;
    let a = new_account(&engine, "alice", "Wallet A", 0).await;
    let engine = Arc::new(engine);

    let mut tasks = JoinSet::new();
    for i in 0..20 {
        let db = db.clone();
        tasks.spawn(async move {
            let delta = if i % 2 == 0 { 300 } else { -100 };
            LedgerStore::new(&db).adjust_balance(a, delta).await
        });
    }
    for _ in 0..20 {
        let engine = Arc::clone(&engine);
        tasks.spawn(async move {
            engine
                .create_transaction(NewTransactionCmd::new(
                    "alice",
                    TransactionFields::income(a, 50, day(2026, 2, 11)),
                ))
                .await
                .map(|_| ())
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    // 10 * 300 - 10 * 100 from direct adjustments, 20 * 50 from transactions.
    assert_eq!(balance(&engine, "alice", a).await, 3_000);
}
