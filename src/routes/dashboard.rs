use rocket::serde::json::Json;
use rocket::{get, routes, State};

use crate::error::ApiError;
use crate::models::stats::DashboardStats;
use crate::store::{SharedStore, LIST_LIMIT};

#[get("/dashboard-stats")]
pub async fn dashboard_stats(store: &State<SharedStore>) -> Result<Json<DashboardStats>, ApiError> {
    let events = store
        .list(LIST_LIMIT)
        .await
        .map_err(ApiError::store("Error fetching stats"))?;
    Ok(Json(DashboardStats::from_events(&events)))
}

#[get("/organizer/summary")]
pub async fn organizer_summary(
    store: &State<SharedStore>,
) -> Result<Json<DashboardStats>, ApiError> {
    dashboard_stats(store).await
}

pub fn routes() -> Vec<rocket::Route> {
    routes![dashboard_stats, organizer_summary]
}
