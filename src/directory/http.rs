use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    database::PostgresConnection,
    funds::queries::FundBalanceQueries,
    http_err::{ApiError, ApiResponse},
    server::AppState,
    session::AccountContext,
};

use super::{models, queries::DirectoryQueries};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(get_clients))
        .route("/clients/:client_id/balances", get(get_client_balances))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRep {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

impl From<&models::Client> for ClientRep {
    fn from(client: &models::Client) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
            email: client.email.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundBalanceRep {
    pub fund_id: String,
    pub balance: Decimal,
    pub as_of_date: NaiveDate,
}

impl From<&crate::funds::models::FundBalance> for FundBalanceRep {
    fn from(balance: &crate::funds::models::FundBalance) -> Self {
        Self {
            fund_id: balance.fund_id.clone(),
            balance: balance.balance,
            as_of_date: balance.as_of_date,
        }
    }
}

async fn get_clients(
    ctx: AccountContext,
    State(db): State<PostgresConnection>,
) -> ApiResponse<Json<Vec<ClientRep>>> {
    let clients = db.list_clients(ctx.user_id()).await?;

    Ok(Json(clients.iter().map(ClientRep::from).collect()))
}

async fn get_client_balances(
    ctx: AccountContext,
    State(db): State<PostgresConnection>,
    Path(client_id): Path<i64>,
) -> ApiResponse<Json<Vec<FundBalanceRep>>> {
    db.get_client(ctx.user_id(), client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found.".to_owned()))?;

    let balances = db.list_for_client(client_id).await?;

    Ok(Json(balances.iter().map(FundBalanceRep::from).collect()))
}
