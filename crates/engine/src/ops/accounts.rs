use uuid::Uuid;

use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{
    Account, EngineError, NewAccountCmd, ResultEngine, UpdateAccountCmd, accounts, transactions,
    util::{ensure_opening_balance, name_key, normalize_icon, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    /// Return an account snapshot from DB.
    pub async fn account(&self, account_id: Uuid, user_id: &str) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, user_id, account_id).await?;
            Account::try_from(model)
        })
    }

    /// All accounts of a user, ordered by name.
    pub async fn list_accounts(&self, user_id: &str) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(accounts::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Account::try_from).collect()
    }

    /// Add a new account.
    ///
    /// `opening_balance_minor` becomes both the opening and the current
    /// balance; from then on only transactions move the balance.
    pub async fn new_account(&self, cmd: NewAccountCmd) -> ResultEngine<Uuid> {
        let name = normalize_required_name(&cmd.name, "account")?;
        ensure_opening_balance(cmd.opening_balance_minor)?;
        let icon = normalize_icon(cmd.icon.as_deref(), accounts::DEFAULT_ICON);
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &cmd.user_id).await?;
            self.ensure_account_name_free(&db_tx, &cmd.user_id, &name, None)
                .await?;

            let account = Account::new(
                cmd.user_id.clone(),
                name,
                cmd.opening_balance_minor,
                cmd.currency,
                icon,
            );
            accounts::insert(&db_tx, &account).await?;
            Ok(account.id)
        })
    }

    /// Edit name, currency or icon. The balance is not editable.
    pub async fn update_account(&self, cmd: UpdateAccountCmd) -> ResultEngine<Account> {
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "account"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_account(&db_tx, &cmd.user_id, cmd.account_id)
                .await?;

            if let Some(name) = name.as_deref() {
                self.ensure_account_name_free(&db_tx, &cmd.user_id, name, Some(model.id))
                    .await?;
            }
            let currency = cmd
                .currency
                .map_or_else(|| model.currency.clone(), |c| c.code().to_string());
            let icon = cmd.icon.as_deref().map_or_else(
                || model.icon.clone(),
                |icon| normalize_icon(Some(icon), accounts::DEFAULT_ICON),
            );

            let active = accounts::ActiveModel {
                id: ActiveValue::Unchanged(model.id),
                name: ActiveValue::Set(name.unwrap_or(model.name)),
                currency: ActiveValue::Set(currency),
                icon: ActiveValue::Set(icon),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            Account::try_from(updated)
        })
    }

    /// Delete an account.
    ///
    /// Refused while any transaction uses the account as its source. Transfers
    /// that only point at it as destination lose that destination; their
    /// source debit stays as it is, so no surviving balance changes.
    pub async fn delete_account(&self, account_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, user_id, account_id).await?;

            let as_source = transactions::Entity::find()
                .filter(transactions::Column::AccountId.eq(model.id))
                .count(&db_tx)
                .await?;
            if as_source > 0 {
                return Err(EngineError::AccountInUse(format!(
                    "account '{}' is the source of {as_source} transaction(s)",
                    model.name
                )));
            }

            let detached = transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::DestinationAccountId,
                    Expr::value(Option::<Uuid>::None),
                )
                .filter(transactions::Column::DestinationAccountId.eq(model.id))
                .exec(&db_tx)
                .await?;
            if detached.rows_affected > 0 {
                tracing::info!(
                    account_id = %model.id,
                    transfers = detached.rows_affected,
                    "detached transfers from deleted destination account"
                );
            }

            accounts::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Names are compared by [`name_key`], so "Cash" and " cash " collide.
    async fn ensure_account_name_free(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        name: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let key = name_key(name);
        let taken = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id.to_string()))
            .all(db)
            .await?
            .into_iter()
            .any(|other| Some(other.id) != except && name_key(&other.name) == key);
        if taken {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }
}
