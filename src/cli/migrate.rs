use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub struct MigrationOpts {
    pub database_url: String,
}

/// Apply any pending database migrations.
pub async fn run_migrations(opts: MigrationOpts) -> anyhow::Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&opts.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Database migrations are up to date.");

    Ok(())
}
