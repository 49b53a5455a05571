use mongodb::bson::oid::ObjectId;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put, routes, State};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::ApiError;
use crate::models::event::{EventDraft, EventPatch};
use crate::store::{SharedStore, LIST_LIMIT};

/// Parses a path id; anything that is not a 24-digit hex ObjectId is malformed.
pub fn parse_event_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::InvalidId)
}

#[get("/events")]
pub async fn list_events(store: &State<SharedStore>) -> Result<Json<Vec<Value>>, ApiError> {
    let events = store
        .list(LIST_LIMIT)
        .await
        .map_err(ApiError::store("Error fetching events"))?;
    Ok(Json(events.into_iter().map(|event| event.into_json()).collect()))
}

#[post("/events", data = "<payload>")]
pub async fn create_event(
    store: &State<SharedStore>,
    payload: Json<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let draft = EventDraft::from_json(payload.into_inner())
        .map_err(ApiError::invalid("Error creating event"))?;
    let event = store
        .insert(draft)
        .await
        .map_err(ApiError::invalid("Error creating event"))?;

    info!(event_id = %event.id, title = event.display_title(), "event created");
    Ok(Json(event.into_json()))
}

#[get("/events/<id>")]
pub async fn get_event(store: &State<SharedStore>, id: &str) -> Result<Json<Value>, ApiError> {
    let object_id = parse_event_id(id)?;
    let event = store
        .find(object_id)
        .await
        .map_err(ApiError::store("Error fetching event"))?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(event.into_json()))
}

#[put("/events/<id>", data = "<payload>")]
pub async fn update_event(
    store: &State<SharedStore>,
    id: &str,
    payload: Json<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let object_id = parse_event_id(id)?;
    let patch = EventPatch::from_json(payload.into_inner())
        .map_err(ApiError::invalid("Error updating event"))?;
    let event = store
        .update(object_id, patch)
        .await
        .map_err(ApiError::store("Error updating event"))?
        .ok_or(ApiError::NotFound)?;

    info!(event_id = %event.id, "event updated");
    Ok(Json(event.into_json()))
}

#[delete("/events/<id>")]
pub async fn delete_event(store: &State<SharedStore>, id: &str) -> Result<Json<Value>, ApiError> {
    let object_id = parse_event_id(id)?;
    let deleted = store
        .delete(object_id)
        .await
        .map_err(ApiError::store("Error deleting event"))?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!(event_id = %object_id, "event deleted");
    Ok(Json(json!({ "message": "Event deleted successfully" })))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_events, create_event, get_event, update_event, delete_event]
}
