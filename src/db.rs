use mongodb::{options::ClientOptions, Client, Database};

use crate::config::Config;

/// Connects the process-wide MongoDB client. The driver pools connections
/// and connects lazily, so this only fails on an unusable URI.
pub async fn init_db(config: &Config) -> mongodb::error::Result<Database> {
    let mut client_options = ClientOptions::parse(&config.mongo_uri).await?;
    client_options.app_name = Some("eventease".to_string());

    let client = Client::with_options(client_options)?;
    Ok(client.database(&config.database))
}
