//! JSON bodies exchanged with the HTTP server.
//!
//! Amounts are always integers in minor units (`*_minor` fields).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Php,
    Usd,
    Eur,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub username: String,
        pub password: String,
        pub display_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserCreated {
        pub username: String,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        /// Starting balance, may be negative.
        #[serde(default)]
        pub opening_balance_minor: i64,
        pub currency: Option<Currency>,
        pub icon: Option<String>,
    }

    /// Partial update. The balance is not editable.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub name: Option<String>,
        pub currency: Option<Currency>,
        pub icon: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub balance_minor: i64,
        pub opening_balance_minor: i64,
        pub currency: Currency,
        pub icon: String,
        /// Human readable balance, e.g. `"75.00 PHP"`.
        pub formatted_balance: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountCreated {
        pub id: Uuid,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub icon: Option<String>,
        /// `#rrggbb`
        pub color: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub icon: String,
        pub color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreated {
        pub id: Uuid,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Expense,
        Income,
        Transfer,
    }

    /// Body of both create and full update requests.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionInput {
        pub kind: TransactionKind,
        pub account_id: Uuid,
        /// Required for transfers, ignored otherwise.
        pub destination_account_id: Option<Uuid>,
        /// Ignored for transfers.
        pub category_id: Option<Uuid>,
        /// Must be > 0.
        pub amount_minor: i64,
        pub description: Option<String>,
        /// Calendar date, `YYYY-MM-DD`.
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub account_id: Uuid,
        pub destination_account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }
}

pub mod dashboard {
    use super::*;
    use crate::transaction::TransactionView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardQuery {
        /// Defaults to the server's current UTC date.
        pub today: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DayTotals {
        pub date: NaiveDate,
        pub day: String,
        pub income_minor: i64,
        pub expense_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardView {
        pub total_balance_minor: i64,
        pub this_month_expenses_minor: i64,
        pub recent_transactions: Vec<TransactionView>,
        pub chart_data: Vec<DayTotals>,
    }
}

pub mod audit {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceAuditView {
        pub account_id: Uuid,
        pub name: String,
        pub cached_balance_minor: i64,
        pub expected_balance_minor: i64,
        pub consistent: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuditResponse {
        pub accounts: Vec<BalanceAuditView>,
    }
}
