use api_types::audit::{AuditResponse, BalanceAuditView};
use axum::{Extension, Json, extract::State};

use crate::{AuthUser, ServerError, server::ServerState};

/// Compare cached balances with the ledger. Never repairs anything.
pub async fn get(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<AuditResponse>, ServerError> {
    let accounts = state
        .engine
        .audit_balances(&user)
        .await?
        .into_iter()
        .map(|entry| BalanceAuditView {
            consistent: entry.is_consistent(),
            account_id: entry.account_id,
            name: entry.name,
            cached_balance_minor: entry.cached_balance,
            expected_balance_minor: entry.expected_balance,
        })
        .collect();
    Ok(Json(AuditResponse { accounts }))
}
