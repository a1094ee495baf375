//! Accounts API endpoints

use api_types::account::{AccountCreated, AccountNew, AccountUpdate, AccountView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Money, NewAccountCmd, UpdateAccountCmd};
use uuid::Uuid;

use crate::{AuthUser, ServerError, server::ServerState};

pub(crate) fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Php => api_types::Currency::Php,
        engine::Currency::Usd => api_types::Currency::Usd,
        engine::Currency::Eur => api_types::Currency::Eur,
    }
}

pub(crate) fn engine_currency(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Php => engine::Currency::Php,
        api_types::Currency::Usd => engine::Currency::Usd,
        api_types::Currency::Eur => engine::Currency::Eur,
    }
}

fn view(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        formatted_balance: Money::new(account.balance, account.currency).to_string(),
        name: account.name,
        balance_minor: account.balance,
        opening_balance_minor: account.opening_balance,
        currency: map_currency(account.currency),
        icon: account.icon,
    }
}

pub async fn list(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.list_accounts(&user).await?;
    Ok(Json(accounts.into_iter().map(view).collect()))
}

pub async fn create(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountCreated>), ServerError> {
    let mut cmd = NewAccountCmd::new(user, payload.name)
        .opening_balance(payload.opening_balance_minor)
        .currency(engine_currency(payload.currency.unwrap_or_default()));
    if let Some(icon) = payload.icon {
        cmd = cmd.icon(icon);
    }
    let id = state.engine.new_account(cmd).await?;
    Ok((StatusCode::CREATED, Json(AccountCreated { id })))
}

pub async fn update(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountUpdate>,
) -> Result<Json<AccountView>, ServerError> {
    let mut cmd = UpdateAccountCmd::new(user, id);
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(currency) = payload.currency {
        cmd = cmd.currency(engine_currency(currency));
    }
    if let Some(icon) = payload.icon {
        cmd = cmd.icon(icon);
    }
    let account = state.engine.update_account(cmd).await?;
    Ok(Json(view(account)))
}

pub async fn delete(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account(id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
