//! Transactions API endpoints

use api_types::transaction::{
    TransactionCreated, TransactionInput, TransactionKind as ApiKind, TransactionList,
    TransactionListResponse, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{NewTransactionCmd, TransactionFields, UpdateTransactionCmd};
use uuid::Uuid;

use crate::{AuthUser, ServerError, server::ServerState};

const DEFAULT_LIMIT: u64 = 50;

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Transfer => ApiKind::Transfer,
    }
}

fn engine_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Expense => engine::TransactionKind::Expense,
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Transfer => engine::TransactionKind::Transfer,
    }
}

pub(crate) fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        account_id: tx.account_id,
        destination_account_id: tx.destination_account_id,
        category_id: tx.category_id,
        amount_minor: tx.amount_minor,
        description: tx.description,
        date: tx.date,
    }
}

fn fields(input: TransactionInput) -> TransactionFields {
    let mut fields = TransactionFields::new(
        engine_kind(input.kind),
        input.account_id,
        input.amount_minor,
        input.date,
    );
    if let Some(destination) = input.destination_account_id {
        fields = fields.destination(destination);
    }
    if let Some(category) = input.category_id {
        fields = fields.category(category);
    }
    if let Some(description) = input.description {
        fields = fields.description(description);
    }
    fields
}

pub async fn list(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let transactions = state
        .engine
        .list_transactions(&user, Some(limit))
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn get(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(id, &user).await?;
    Ok(Json(view(tx)))
}

pub async fn create(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionInput>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state
        .engine
        .create_transaction(NewTransactionCmd::new(user, fields(payload)))
        .await?;
    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn update(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionInput>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .update_transaction(UpdateTransactionCmd::new(user, id, fields(payload)))
        .await?;
    Ok(Json(view(tx)))
}

pub async fn delete(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
