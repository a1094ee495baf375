//! The module contains `Account` struct and its storage model.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine};

pub(crate) const DEFAULT_ICON: &str = "Wallet";

/// An account.
///
/// An account is a place where money is kept: a wallet, a bank account, a
/// credit card. Its `balance` is a cache of `opening_balance` plus the effects
/// of every stored transaction that references it, and only the reconciliation
/// engine moves it after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub balance: i64,
    pub opening_balance: i64,
    pub currency: Currency,
    pub icon: String,
}

impl Account {
    pub fn new(
        user_id: String,
        name: String,
        opening_balance: i64,
        currency: Currency,
        icon: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            balance: opening_balance,
            opening_balance,
            currency,
            icon,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub balance: i64,
    pub opening_balance: i64,
    pub currency: String,
    pub icon: String,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            balance: ActiveValue::Set(value.balance),
            opening_balance: ActiveValue::Set(value.opening_balance),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            icon: ActiveValue::Set(value.icon.clone()),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            balance: model.balance,
            opening_balance: model.opening_balance,
            currency: Currency::try_from(model.currency.as_str())?,
            icon: model.icon,
        })
    }
}

/// Insert a new account row.
///
/// This is the only creation path: user-facing creation and default
/// provisioning both go through it.
pub(crate) async fn insert<C: ConnectionTrait>(db: &C, account: &Account) -> ResultEngine<()> {
    ActiveModel::from(account).insert(db).await?;
    Ok(())
}
