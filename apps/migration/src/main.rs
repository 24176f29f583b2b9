//! Migration CLI for the Quill database.
//!
//! Reads `DATABASE_URL` (a `.env` file is honoured) and accepts the usual
//! sea-orm-migration subcommands (`up`, `down`, `fresh`, `status`).

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info,sea_orm_migration=info")
        .init();

    cli::run_cli(migration::Migrator).await;
}
