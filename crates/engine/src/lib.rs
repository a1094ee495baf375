//! Pitaka engine: accounts, categories and transactions of a personal finance
//! tracker, with cached account balances kept consistent with the ledger.
//!
//! The entry point is [`Engine`]. Every write it performs runs in one database
//! transaction spanning the row change and the balance deltas computed by
//! [`effects`] and applied by [`reconcile`].

pub use accounts::Account;
pub use categories::Category;
pub use commands::{
    NewAccountCmd, NewCategoryCmd, NewTransactionCmd, NewUserCmd, TransactionFields,
    UpdateAccountCmd, UpdateCategoryCmd, UpdateTransactionCmd,
};
pub use currency::Currency;
pub use effects::{Effect, effects, inverse_effects};
pub use error::EngineError;
pub use money::Money;
pub use ops::{BalanceAudit, Dashboard, DailyTotals, Engine, EngineBuilder};
pub use reconcile::Reconciliation;
pub use store::LedgerStore;
pub use transactions::{Transaction, TransactionKind, TransactionSnapshot};

mod accounts;
mod categories;
mod commands;
mod currency;
pub mod effects;
mod error;
mod money;
mod ops;
mod provisioning;
pub mod reconcile;
pub mod store;
mod transactions;
mod users;
mod util;

pub use provisioning::{DEFAULT_ACCOUNTS, DEFAULT_CATEGORIES};
pub use util::MAX_AMOUNT_MINOR;

pub type ResultEngine<T> = Result<T, EngineError>;
