//! EventEase backend: events, their embedded registrations and organizer
//! dashboard statistics, served over HTTP with Rocket.

pub mod config;
pub mod cors;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod store;

use rocket::{catchers, routes, Build, Rocket};

use config::Config;
use cors::Cors;
use routes::{dashboard, events, public, registrations};
use store::SharedStore;

/// Assembles the application around an already-connected store.
pub fn build(config: Config, store: SharedStore) -> Rocket<Build> {
    let mut figment = rocket::Config::figment();
    if let Some(port) = config.port {
        figment = figment.merge(("port", port));
    }

    rocket::custom(figment)
        .manage(store)
        .attach(Cors::new(config.allowed_origins))
        .mount("/", public::routes())
        .mount("/", events::routes())
        .mount("/", registrations::routes())
        .mount("/", dashboard::routes())
        .mount("/", routes![cors::preflight])
        .register(
            "/",
            catchers![
                public::bad_request,
                public::not_found,
                public::unprocessable,
                public::internal_error
            ],
        )
}
