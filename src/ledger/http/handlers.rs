use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    http_err::{ApiError, ApiResponse},
    ledger::{
        domain::transactions::{NewTransaction, TransactionType},
        queries::TransactionQuery,
        services::LedgerService,
    },
    server::AppState,
    session::AccountContext,
};

use super::reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(get_transactions).post(create_transaction),
        )
        .route(
            "/transactions/:transaction_id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetTransactionsParams {
    client_id: Option<i64>,
    #[serde(rename = "type")]
    kind: Option<String>,
    after: Option<reps::EncodedTransactionCursor>,
}

async fn get_transactions(
    ctx: AccountContext,
    State(ledger_service): State<LedgerService>,
    Query(params): Query<GetTransactionsParams>,
) -> ApiResponse<Json<reps::ResourceCollection<reps::TransactionRep, reps::EncodedTransactionCursor>>>
{
    let kind = match params.kind.as_deref() {
        None => None,
        Some(raw) => match TransactionType::parse(raw) {
            Some(kind) => Some(kind),
            None => {
                return Err(ApiError::BadRequest(format!(
                    "Unrecognized transaction type: {raw}",
                )))
            }
        },
    };

    let after = match params.after {
        None => None,
        Some(encoded) => match encoded.decode() {
            Some(cursor) => Some(cursor),
            None => {
                return Err(ApiError::BadRequest(
                    "The 'after' cursor is malformed.".to_owned(),
                ))
            }
        },
    };

    let query = TransactionQuery {
        user_id: ctx.user_id(),
        client_id: params.client_id,
        kind,
        after,
    };

    let transactions = ledger_service.list_transactions(query).await?;

    Ok(Json(reps::ResourceCollection {
        next: transactions.next.map(Into::into),
        items: transactions
            .items
            .iter()
            .map(reps::TransactionRep::from)
            .collect(),
    }))
}

async fn get_transaction(
    ctx: AccountContext,
    State(ledger_service): State<LedgerService>,
    Path(transaction_id): Path<i64>,
) -> ApiResponse<Json<reps::TransactionRep>> {
    let transaction = ledger_service
        .get_transaction(ctx.user_id(), transaction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction not found.".to_owned()))?;

    Ok(Json((&transaction).into()))
}

async fn create_transaction(
    ctx: AccountContext,
    State(ledger_service): State<LedgerService>,
    Json(payload): Json<reps::TransactionPayload>,
) -> ApiResponse<(StatusCode, Json<reps::TransactionRep>)> {
    let new_transaction = NewTransaction::new(payload.into())?;

    let saved = ledger_service
        .create_transaction(ctx.user_id(), new_transaction)
        .await?;

    Ok((StatusCode::CREATED, Json((&saved).into())))
}

async fn update_transaction(
    ctx: AccountContext,
    State(ledger_service): State<LedgerService>,
    Path(transaction_id): Path<i64>,
    Json(payload): Json<reps::TransactionPayload>,
) -> ApiResponse<Json<reps::TransactionRep>> {
    let update = NewTransaction::new(payload.into())?;

    let saved = ledger_service
        .update_transaction(ctx.user_id(), transaction_id, update)
        .await?;

    Ok(Json((&saved).into()))
}

async fn delete_transaction(
    ctx: AccountContext,
    State(ledger_service): State<LedgerService>,
    Path(transaction_id): Path<i64>,
) -> ApiResponse<StatusCode> {
    debug!(
        user_id = ctx.user_id(),
        transaction_id, "Deleting transaction."
    );

    ledger_service
        .delete_transaction(ctx.user_id(), transaction_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
