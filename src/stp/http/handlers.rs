use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    http_err::ApiResponse,
    server::AppState,
    session::AccountContext,
    stp::{
        domain::StpTransfer,
        services::{StpService, DEFAULT_TREND_MONTHS},
    },
};

use super::reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(get_summary))
        .route("/transactions", get(get_transactions))
        .route("/validate", post(validate_transaction))
        .route("/process", post(process_transaction))
}

#[derive(Deserialize)]
struct SummaryParams {
    months: Option<u32>,
}

async fn get_summary(
    ctx: AccountContext,
    State(stp_service): State<StpService>,
    Query(params): Query<SummaryParams>,
) -> ApiResponse<Json<reps::StpSummary>> {
    let months = params.months.unwrap_or(DEFAULT_TREND_MONTHS);

    debug!(user_id = ctx.user_id(), months, "Generating STP summary.");

    let summary = stp_service.summary(ctx.user_id(), months).await?;

    Ok(Json((&summary).into()))
}

async fn get_transactions(
    ctx: AccountContext,
    State(stp_service): State<StpService>,
) -> ApiResponse<Json<Vec<reps::StpTransaction>>> {
    let plans = stp_service.list_plans(ctx.user_id()).await?;

    Ok(Json(plans.iter().map(reps::StpTransaction::from).collect()))
}

async fn validate_transaction(
    ctx: AccountContext,
    State(stp_service): State<StpService>,
    Json(payload): Json<reps::StpTransactionPayload>,
) -> ApiResponse<StatusCode> {
    let transfer = StpTransfer::try_from(payload)?;

    stp_service.validate(ctx.user_id(), &transfer).await?;

    Ok(StatusCode::OK)
}

async fn process_transaction(
    ctx: AccountContext,
    State(stp_service): State<StpService>,
    Json(payload): Json<reps::StpTransactionPayload>,
) -> ApiResponse<Json<reps::StpTransaction>> {
    let transfer = StpTransfer::try_from(payload)?;

    let plan = stp_service.execute(ctx.user_id(), &transfer).await?;

    Ok(Json((&plan).into()))
}
