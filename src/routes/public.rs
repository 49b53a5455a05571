use rocket::serde::json::Json;
use rocket::{catch, get, routes, Request};
use serde_json::{json, Value};

#[get("/")]
pub fn health() -> Json<Value> {
    Json(json!({ "message": "Backend is running successfully!", "status": "ok" }))
}

#[catch(400)]
pub fn bad_request(_request: &Request<'_>) -> Json<Value> {
    Json(json!({ "detail": "Malformed request body" }))
}

#[catch(404)]
pub fn not_found(_request: &Request<'_>) -> Json<Value> {
    Json(json!({ "detail": "Not Found" }))
}

#[catch(422)]
pub fn unprocessable(_request: &Request<'_>) -> Json<Value> {
    Json(json!({ "detail": "Request body must be a JSON object" }))
}

#[catch(500)]
pub fn internal_error(_request: &Request<'_>) -> Json<Value> {
    Json(json!({ "detail": "Internal Server Error" }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![health]
}
