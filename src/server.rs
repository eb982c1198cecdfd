use std::sync::Arc;

use axum::{extract::FromRef, Router};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::{
    database::{self, PoolOptions, PostgresConnection},
    ledger::{
        commands::DynTransactionCommands, queries::DynTransactionQueries, services::LedgerService,
    },
    stp::{commands::DynStpCommands, queries::DynStpQueries, services::StpService},
};

pub struct Options {
    pub database_pool_size: u32,
    pub database_timeout_seconds: u8,
    pub database_url: String,

    pub port: u16,
}

#[derive(Clone)]
pub struct AppState {
    db: PostgresConnection,
    ledger_service: LedgerService,
    stp_service: StpService,
}

pub async fn serve(opts: Options) -> anyhow::Result<()> {
    let db_pool = database::connect(&PoolOptions {
        max_connections: opts.database_pool_size,
        acquire_timeout_seconds: opts.database_timeout_seconds,
        url: opts.database_url,
    })
    .await?;

    let db = PostgresConnection::new(db_pool);

    let transaction_queries: DynTransactionQueries = Arc::new(db.clone());
    let transaction_commands: DynTransactionCommands = Arc::new(db.clone());
    let ledger_service = LedgerService::new(transaction_queries, transaction_commands);

    let stp_queries: DynStpQueries = Arc::new(db.clone());
    let stp_commands: DynStpCommands = Arc::new(db.clone());
    let stp_service = StpService::new(
        Arc::new(db.clone()),
        Arc::new(db.clone()),
        stp_queries,
        stp_commands,
    );

    let state = AppState {
        db,
        ledger_service,
        stp_service,
    };

    let app = Router::new()
        .merge(crate::directory::http::routes())
        .merge(crate::ledger::http::routes())
        .merge(crate::notes::http::routes())
        .nest("/stp", crate::stp::http::routes())
        .layer(
            CorsLayer::new()
                .allow_headers(Any)
                .allow_methods(Any)
                .allow_origin(Any),
        )
        .with_state(state);

    let address = format!("0.0.0.0:{}", opts.port).parse()?;

    info!(%address, "Server listening.");

    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

impl FromRef<AppState> for PostgresConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.pool().clone()
    }
}

impl FromRef<AppState> for LedgerService {
    fn from_ref(state: &AppState) -> Self {
        state.ledger_service.clone()
    }
}

impl FromRef<AppState> for StpService {
    fn from_ref(state: &AppState) -> Self {
        state.stp_service.clone()
    }
}
