use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{AuthUser, ServerState, router, run, run_with_listener, spawn_with_listener};

mod accounts;
mod audit;
mod categories;
mod dashboard;
mod server;
mod transactions;
mod user;

pub mod types {
    pub mod account {
        pub use api_types::account::{AccountCreated, AccountNew, AccountUpdate, AccountView};
    }

    pub mod category {
        pub use api_types::category::{CategoryCreated, CategoryNew, CategoryUpdate, CategoryView};
    }

    pub mod user {
        pub use api_types::user::{UserCreated, UserNew};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            TransactionCreated, TransactionInput, TransactionKind, TransactionList,
            TransactionListResponse, TransactionView,
        };
    }

    pub mod dashboard {
        pub use api_types::dashboard::{DashboardQuery, DashboardView, DayTotals};
    }

    pub mod audit {
        pub use api_types::audit::{AuditResponse, BalanceAuditView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::AccountInUse(_) => StatusCode::CONFLICT,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_)
        | EngineError::InvalidTransaction(_)
        | EngineError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::MissingAccount(_)
        | EngineError::Concurrency(_)
        | EngineError::Hashing(_)
        | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Concurrency(msg) => {
            tracing::error!("balance update failed: {msg}");
            "internal server error".to_string()
        }
        EngineError::MissingAccount(id) => {
            tracing::error!("balance effect on missing account {id}");
            "internal server error".to_string()
        }
        EngineError::Hashing(msg) => {
            tracing::error!("password hashing failed: {msg}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
