//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Currency, TransactionKind};

/// Register a new user.
#[derive(Clone, Debug)]
pub struct NewUserCmd {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
}

impl NewUserCmd {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            display_name: None,
        }
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// Create an account.
///
/// `opening_balance_minor` is the manual adjustment recorded at creation; it
/// may be negative (e.g. a credit card that already carries debt).
#[derive(Clone, Debug)]
pub struct NewAccountCmd {
    pub user_id: String,
    pub name: String,
    pub opening_balance_minor: i64,
    pub currency: Currency,
    pub icon: Option<String>,
}

impl NewAccountCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            opening_balance_minor: 0,
            currency: Currency::default(),
            icon: None,
        }
    }

    #[must_use]
    pub fn opening_balance(mut self, amount_minor: i64) -> Self {
        self.opening_balance_minor = amount_minor;
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Edit an account. `None` leaves the field untouched; the balance is never
/// editable.
#[derive(Clone, Debug)]
pub struct UpdateAccountCmd {
    pub user_id: String,
    pub account_id: Uuid,
    pub name: Option<String>,
    pub currency: Option<Currency>,
    pub icon: Option<String>,
}

impl UpdateAccountCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, account_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            account_id,
            name: None,
            currency: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Create a category.
#[derive(Clone, Debug)]
pub struct NewCategoryCmd {
    pub user_id: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: String,
}

impl NewCategoryCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            icon: None,
            color: color.into(),
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct UpdateCategoryCmd {
    pub user_id: String,
    pub category_id: Uuid,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl UpdateCategoryCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, category_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            category_id,
            name: None,
            icon: None,
            color: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// The editable fields of a transaction.
///
/// Shared by creation and full replacement on update. The engine normalizes
/// them before storage: the destination is dropped unless `kind` is
/// `Transfer`, the category is dropped for transfers, and the description is
/// trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionFields {
    pub kind: TransactionKind,
    pub account_id: Uuid,
    pub destination_account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl TransactionFields {
    #[must_use]
    pub fn new(kind: TransactionKind, account_id: Uuid, amount_minor: i64, date: NaiveDate) -> Self {
        Self {
            kind,
            account_id,
            destination_account_id: None,
            category_id: None,
            amount_minor,
            description: None,
            date,
        }
    }

    #[must_use]
    pub fn expense(account_id: Uuid, amount_minor: i64, date: NaiveDate) -> Self {
        Self::new(TransactionKind::Expense, account_id, amount_minor, date)
    }

    #[must_use]
    pub fn income(account_id: Uuid, amount_minor: i64, date: NaiveDate) -> Self {
        Self::new(TransactionKind::Income, account_id, amount_minor, date)
    }

    #[must_use]
    pub fn transfer(
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount_minor: i64,
        date: NaiveDate,
    ) -> Self {
        Self::new(TransactionKind::Transfer, from_account_id, amount_minor, date)
            .destination(to_account_id)
    }

    #[must_use]
    pub fn destination(mut self, account_id: Uuid) -> Self {
        self.destination_account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Record a new transaction.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub user_id: String,
    pub fields: TransactionFields,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, fields: TransactionFields) -> Self {
        Self {
            user_id: user_id.into(),
            fields,
        }
    }
}

/// Replace the editable fields of an existing transaction.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub user_id: String,
    pub transaction_id: Uuid,
    pub fields: TransactionFields,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, transaction_id: Uuid, fields: TransactionFields) -> Self {
        Self {
            user_id: user_id.into(),
            transaction_id,
            fields,
        }
    }
}
