use anyhow::Context;
use dotenvy::dotenv;
use mongodb::bson::{doc, Bson};
use tracing::info;

use eventease::config::Config;
use eventease::db::init_db;
use eventease::logging;
use eventease::models::event::EventDraft;
use eventease::store::{EventStore, MongoEventStore};

/// Replaces the `events` collection with a few sample events.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init();

    let config = Config::from_env();
    let db = init_db(&config).await.context("failed to configure MongoDB client")?;
    let store = MongoEventStore::new(&db);

    let removed = store.collection().delete_many(doc! {}, None).await?;
    info!(removed = removed.deleted_count, "cleared events collection");

    let today = chrono::Utc::now().date_naive();
    let samples = [
        ("Tech Career Fair", 30, "Main Auditorium"),
        ("Intro to Rust Workshop", 14, "Lab 3"),
        ("Alumni Networking Night", 45, "Student Center"),
    ];

    for (title, days_ahead, venue) in samples {
        let date = today + chrono::Duration::days(days_ahead);
        let draft = EventDraft {
            title: Some(title.to_string()),
            date: Some(Bson::String(date.format("%Y-%m-%d").to_string())),
            extra: doc! { "venue": venue },
            ..Default::default()
        };
        let event = store.insert(draft).await?;
        info!(event_id = %event.id, title, "sample event added");
    }

    info!("seeding complete");
    Ok(())
}
