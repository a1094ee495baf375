use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewTransactionCmd, ResultEngine, Transaction, TransactionFields, TransactionKind,
    UpdateTransactionCmd, reconcile,
    store::LedgerStore,
    transactions,
    util::{ensure_positive_amount, normalize_optional_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Record a transaction and apply its balance effects.
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Uuid> {
        with_tx!(self, |db_tx| {
            let fields = self
                .validate_fields(&db_tx, &cmd.user_id, cmd.fields)
                .await?;
            let tx = Transaction::from_fields(cmd.user_id.clone(), fields, Utc::now());
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            let report = reconcile::on_transaction_created(&LedgerStore::new(&db_tx), &tx).await?;
            tracing::debug!(
                transaction_id = %tx.id,
                kind = %tx.kind,
                effects = report.applied.len(),
                "transaction created"
            );
            Ok(tx.id)
        })
    }

    /// Replace the editable fields of a transaction and move balances from
    /// its previous version to the new one.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, &cmd.user_id, cmd.transaction_id)
                .await?;
            let current = Transaction::try_from(model)?;
            let previous = current.snapshot();

            let fields = self
                .validate_fields(&db_tx, &cmd.user_id, cmd.fields)
                .await?;
            let updated = current.with_fields(fields);
            transactions::ActiveModel::from(&updated)
                .update(&db_tx)
                .await?;

            let report = reconcile::on_transaction_updated(
                &LedgerStore::new(&db_tx),
                &updated,
                &previous,
            )
            .await?;
            if !report.skipped.is_empty() {
                tracing::warn!(
                    transaction_id = %updated.id,
                    skipped = report.skipped.len(),
                    "transaction updated with skipped reversals"
                );
            }
            Ok(updated)
        })
    }

    /// Delete a transaction after reversing its balance effects.
    pub async fn delete_transaction(&self, transaction_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            let tx = Transaction::try_from(model)?;

            reconcile::on_transaction_deleted(&LedgerStore::new(&db_tx), &tx).await?;
            transactions::Entity::delete_by_id(tx.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    pub async fn transaction(&self, transaction_id: Uuid, user_id: &str) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            Transaction::try_from(model)
        })
    }

    /// Transactions of a user, newest first: by `date`, then by creation time.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Normalize fields and check that everything they reference belongs to
    /// `user_id`.
    async fn validate_fields(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        fields: TransactionFields,
    ) -> ResultEngine<TransactionFields> {
        ensure_positive_amount(fields.amount_minor)?;
        let description = normalize_optional_text(fields.description.as_deref())?;

        let (destination_account_id, category_id) = match fields.kind {
            TransactionKind::Transfer => {
                let destination = fields.destination_account_id.ok_or_else(|| {
                    EngineError::InvalidTransaction(
                        "transfer requires a destination account".to_string(),
                    )
                })?;
                if destination == fields.account_id {
                    return Err(EngineError::InvalidTransaction(
                        "transfer destination must differ from source".to_string(),
                    ));
                }
                (Some(destination), None)
            }
            TransactionKind::Expense | TransactionKind::Income => (None, fields.category_id),
        };

        self.require_account(db, user_id, fields.account_id).await?;
        if let Some(destination) = destination_account_id {
            self.require_account(db, user_id, destination).await?;
        }
        if let Some(category_id) = category_id {
            self.require_category(db, user_id, category_id).await?;
        }

        Ok(TransactionFields {
            destination_account_id,
            category_id,
            description,
            ..fields
        })
    }
}
