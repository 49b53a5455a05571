use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use eventease::config::Config;
use eventease::db::init_db;
use eventease::logging;
use eventease::store::{MongoEventStore, SharedStore};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init();

    let config = Config::from_env();
    let db = init_db(&config)
        .await
        .with_context(|| format!("failed to configure MongoDB client for {}", config.database))?;
    info!(database = %config.database, "connected to MongoDB");

    let store: SharedStore = Arc::new(MongoEventStore::new(&db));
    eventease::build(config, store)
        .launch()
        .await
        .context("server terminated with an error")?;

    info!("server shut down");
    Ok(())
}
