//! Ledger store: the balance-facing view of the accounts table.
//!
//! Bound to a single connection, usually the open `DatabaseTransaction` of a
//! unit of work, so every adjustment commits or rolls back with the row change
//! that caused it.

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{Account, EngineError, ResultEngine, accounts};

#[derive(Clone, Copy, Debug)]
pub struct LedgerStore<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> LedgerStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_account(&self, account_id: Uuid) -> ResultEngine<Option<Account>> {
        accounts::Entity::find_by_id(account_id)
            .one(self.conn)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    /// Add `delta` to the account's balance.
    ///
    /// Issued as a single `balance = balance + delta` statement so concurrent
    /// writers never overwrite each other's deltas. The statement only matches
    /// while the result still fits in an `i64`.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingAccount`] when no account has this id and
    /// [`EngineError::Concurrency`] when the statement failed or the new
    /// balance would overflow.
    pub async fn adjust_balance(&self, account_id: Uuid, delta: i64) -> ResultEngine<()> {
        let mut update = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(delta),
            )
            .filter(accounts::Column::Id.eq(account_id));
        if delta > 0 {
            update = update.filter(accounts::Column::Balance.lte(i64::MAX - delta));
        } else if delta < 0 {
            update = update.filter(accounts::Column::Balance.gte(i64::MIN - delta));
        }
        let result = update
            .exec(self.conn)
            .await
            .map_err(|err| EngineError::Concurrency(err.to_string()))?;

        if result.rows_affected == 0 {
            if self.find_account(account_id).await?.is_none() {
                return Err(EngineError::MissingAccount(account_id));
            }
            return Err(EngineError::Concurrency(format!(
                "balance of account {account_id} would overflow by applying {delta}"
            )));
        }
        Ok(())
    }
}
