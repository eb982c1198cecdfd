use std::{ops::Deref, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Options controlling the connection pool for the application database.
pub struct PoolOptions {
    pub max_connections: u32,
    pub acquire_timeout_seconds: u8,
    pub url: String,
}

/// Build the shared connection pool for the application database.
pub async fn connect(opts: &PoolOptions) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(opts.max_connections)
        .acquire_timeout(Duration::from_secs(opts.acquire_timeout_seconds.into()))
        .connect(&opts.url)
        .await
}

#[derive(Clone)]
pub struct PostgresConnection(PgPool);

impl PostgresConnection {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }

    pub fn pool(&self) -> &PgPool {
        &self.0
    }
}

impl Deref for PostgresConnection {
    type Target = PgPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
