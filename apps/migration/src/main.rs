//! Migration CLI for the blog schema.
//!
//! Reads `DATABASE_URL` (or `.env`); run `migration up`, `migration down`,
//! `migration status` and friends.

use blogicum_infra::database::migrations::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    cli::run_cli(Migrator).await;
}
