use std::collections::HashMap;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{ResultEngine, Transaction, accounts, effects, transactions};

use super::{Engine, with_tx};

/// Cached versus ledger-derived balance of one account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BalanceAudit {
    pub account_id: Uuid,
    pub name: String,
    pub cached_balance: i64,
    /// `opening_balance` plus the effects of every stored transaction.
    pub expected_balance: i64,
}

impl BalanceAudit {
    #[must_use]
    pub fn drift(&self) -> i64 {
        self.cached_balance - self.expected_balance
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.drift() == 0
    }
}

impl Engine {
    /// Recompute every balance of `user_id` from the ledger and compare it with
    /// the cached column.
    ///
    /// Read-only: drift is reported, never repaired.
    pub async fn audit_balances(&self, user_id: &str) -> ResultEngine<Vec<BalanceAudit>> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let account_models = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(accounts::Column::Name)
                .all(&db_tx)
                .await?;
            let tx_models = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?;

            let mut derived: HashMap<Uuid, i64> = HashMap::new();
            for model in tx_models {
                let tx = Transaction::try_from(model)?;
                for effect in effects(&tx.snapshot())? {
                    *derived.entry(effect.account_id).or_default() += effect.delta;
                }
            }

            let report: Vec<BalanceAudit> = account_models
                .into_iter()
                .map(|account| BalanceAudit {
                    expected_balance: account.opening_balance
                        + derived.get(&account.id).copied().unwrap_or(0),
                    account_id: account.id,
                    name: account.name,
                    cached_balance: account.balance,
                })
                .collect();

            for entry in report.iter().filter(|entry| !entry.is_consistent()) {
                tracing::warn!(
                    account_id = %entry.account_id,
                    cached = entry.cached_balance,
                    expected = entry.expected_balance,
                    "balance drift detected"
                );
            }
            Ok(report)
        })
    }
}
