//! Reconciliation of cached account balances with the transaction ledger.
//!
//! Every write path that creates, edits or deletes a transaction calls exactly
//! one of the `on_transaction_*` functions inside the same unit of work as the
//! row change. Together they keep, for every account,
//!
//! ```text
//! balance == opening_balance + sum of effects(t) for every stored t
//! ```
//!
//! Forward application is strict: an effect naming a missing account fails
//! the unit of work. Reversal is best-effort: an account that vanished since
//! the effect was applied has nothing left to correct, so the reversal is
//! skipped and reported.

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionSnapshot,
    effects::{Effect, effects, inverse_effects},
    store::LedgerStore,
};

/// What a reconciliation call did to balances.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub applied: Vec<Effect>,
    /// Reversals dropped because their account no longer exists.
    pub skipped: Vec<Effect>,
}

impl Reconciliation {
    fn merge(mut self, other: Reconciliation) -> Self {
        self.applied.extend(other.applied);
        self.skipped.extend(other.skipped);
        self
    }
}

/// Apply the effects of a freshly inserted transaction.
pub async fn on_transaction_created<C: ConnectionTrait>(
    store: &LedgerStore<'_, C>,
    transaction: &Transaction,
) -> ResultEngine<Reconciliation> {
    let forward = effects(&transaction.snapshot())?;
    apply_strict(store, &forward).await
}

/// Undo the effects of a transaction that is about to be deleted.
pub async fn on_transaction_deleted<C: ConnectionTrait>(
    store: &LedgerStore<'_, C>,
    transaction: &Transaction,
) -> ResultEngine<Reconciliation> {
    let backward = inverse_effects(&effects(&transaction.snapshot())?);
    reverse_lenient(store, &backward).await
}

/// Move balances from the `previous` version of a transaction to its current
/// one.
///
/// Both effect sets are computed before anything is touched, then the old set
/// is reversed in full and only afterwards is the new set applied. The two
/// versions may reference entirely different accounts.
pub async fn on_transaction_updated<C: ConnectionTrait>(
    store: &LedgerStore<'_, C>,
    transaction: &Transaction,
    previous: &TransactionSnapshot,
) -> ResultEngine<Reconciliation> {
    let backward = inverse_effects(&effects(previous)?);
    let forward = effects(&transaction.snapshot())?;

    let reversed = reverse_lenient(store, &backward).await?;
    let applied = apply_strict(store, &forward).await?;
    Ok(reversed.merge(applied))
}

async fn apply_strict<C: ConnectionTrait>(
    store: &LedgerStore<'_, C>,
    effects: &[Effect],
) -> ResultEngine<Reconciliation> {
    let mut report = Reconciliation::default();
    for effect in effects {
        if store.find_account(effect.account_id).await?.is_none() {
            return Err(EngineError::MissingAccount(effect.account_id));
        }
        store.adjust_balance(effect.account_id, effect.delta).await?;
        report.applied.push(*effect);
    }
    Ok(report)
}

async fn reverse_lenient<C: ConnectionTrait>(
    store: &LedgerStore<'_, C>,
    effects: &[Effect],
) -> ResultEngine<Reconciliation> {
    let mut report = Reconciliation::default();
    for effect in effects {
        if store.find_account(effect.account_id).await?.is_none() {
            tracing::warn!(
                account_id = %effect.account_id,
                delta = effect.delta,
                "skipping balance reversal, account no longer exists"
            );
            report.skipped.push(*effect);
            continue;
        }
        store.adjust_balance(effect.account_id, effect.delta).await?;
        report.applied.push(*effect);
    }
    Ok(report)
}
