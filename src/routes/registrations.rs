use chrono::Utc;
use rocket::serde::json::Json;
use rocket::{get, post, routes, State};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::ApiError;
use crate::models::registration::Registration;
use crate::routes::events::parse_event_id;
use crate::store::SharedStore;

#[post("/events/<id>/register", data = "<payload>")]
pub async fn register_for_event(
    store: &State<SharedStore>,
    id: &str,
    payload: Json<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let object_id = parse_event_id(id)?;
    let registration = Registration::from_json(payload.into_inner())
        .map_err(ApiError::invalid("Error registering"))?
        .stamped(Utc::now());

    let appended = store
        .append_registration(object_id, registration)
        .await
        .map_err(ApiError::store("Error registering"))?;
    if !appended {
        return Err(ApiError::NotFound);
    }

    info!(event_id = %object_id, "registration added");
    Ok(Json(json!({ "message": "Registration successful" })))
}

#[get("/events/<id>/registrations")]
pub async fn list_registrations(
    store: &State<SharedStore>,
    id: &str,
) -> Result<Json<Vec<Map<String, Value>>>, ApiError> {
    let object_id = parse_event_id(id)?;
    let registrations = store
        .registrations(object_id)
        .await
        .map_err(ApiError::store("Error fetching registrations"))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(registrations.iter().map(Registration::sanitized).collect()))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![register_for_event, list_registrations]
}
