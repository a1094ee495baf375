//! Transaction primitives.
//!
//! A `Transaction` is one ledger row. Its balance effects are derived from
//! `kind`, `amount_minor` and the account references (see `effects`).

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, TransactionFields};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Expense,
    Income,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            "transfer" => Ok(Self::Transfer),
            other => Err(EngineError::Configuration(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub kind: TransactionKind,
    pub account_id: Uuid,
    pub destination_account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// The balance-relevant fields of a transaction, frozen at one point in time.
///
/// The update path captures one of these from the stored row *before* writing
/// the new values, so the old effects can still be reversed afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionSnapshot {
    pub kind: TransactionKind,
    pub account_id: Uuid,
    pub destination_account_id: Option<Uuid>,
    pub amount_minor: i64,
}

impl Transaction {
    /// Build a new ledger row from already validated fields.
    pub(crate) fn from_fields(
        user_id: String,
        fields: TransactionFields,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind: fields.kind,
            account_id: fields.account_id,
            destination_account_id: fields.destination_account_id,
            category_id: fields.category_id,
            amount_minor: fields.amount_minor,
            description: fields.description,
            date: fields.date,
            created_at,
        }
    }

    /// Overwrite every editable field, keeping identity, owner and creation
    /// time.
    pub(crate) fn with_fields(&self, fields: TransactionFields) -> Self {
        Self {
            id: self.id,
            user_id: self.user_id.clone(),
            kind: fields.kind,
            account_id: fields.account_id,
            destination_account_id: fields.destination_account_id,
            category_id: fields.category_id,
            amount_minor: fields.amount_minor,
            description: fields.description,
            date: fields.date,
            created_at: self.created_at,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> TransactionSnapshot {
        TransactionSnapshot {
            kind: self.kind,
            account_id: self.account_id,
            destination_account_id: self.destination_account_id,
            amount_minor: self.amount_minor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub kind: String,
    pub account_id: Uuid,
    pub destination_account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::DestinationAccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    DestinationAccount,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            account_id: ActiveValue::Set(tx.account_id),
            destination_account_id: ActiveValue::Set(tx.destination_account_id),
            category_id: ActiveValue::Set(tx.category_id),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            description: ActiveValue::Set(tx.description.clone()),
            date: ActiveValue::Set(tx.date),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            account_id: model.account_id,
            destination_account_id: model.destination_account_id,
            category_id: model.category_id,
            amount_minor: model.amount_minor,
            description: model.description,
            date: model.date,
            created_at: model.created_at,
        })
    }
}
