use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};

use eventease::config::Config;
use eventease::store::{MemoryStore, SharedStore};

async fn client() -> Client {
    let store: SharedStore = Arc::new(MemoryStore::new());
    Client::tracked(eventease::build(Config::default(), store))
        .await
        .expect("valid rocket instance")
}

async fn create(client: &Client, body: Value) -> Value {
    let response = client
        .post("/events")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    response.into_json().await.expect("event json")
}

async fn register(client: &Client, id: &str, body: Value) -> Status {
    client
        .post(format!("/events/{id}/register"))
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
        .await
        .status()
}

async fn get_json(client: &Client, uri: &str) -> (Status, Value) {
    let response = client.get(uri.to_string()).dispatch().await;
    let status = response.status();
    (status, response.into_json().await.unwrap_or(Value::Null))
}

fn id_of(event: &Value) -> String {
    event["_id"].as_str().expect("string id").to_string()
}

#[rocket::async_test]
async fn health_check() {
    let client = client().await;
    let (status, body) = get_json(&client, "/").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["status"], "ok");
}

#[rocket::async_test]
async fn create_then_fetch_round_trips() {
    let client = client().await;
    let created = create(&client, json!({ "title": "Hack Night", "date": "2025-05-01" })).await;
    let id = id_of(&created);
    assert_eq!(id.len(), 24);

    let (status, fetched) = get_json(&client, &format!("/events/{id}")).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(fetched["_id"], json!(id));
    assert_eq!(fetched["title"], "Hack Night");
    assert_eq!(fetched["date"], "2025-05-01");
    assert_eq!(fetched["registrations"], json!([]));
}

#[rocket::async_test]
async fn create_keeps_supplied_registrations_and_ignores_id() {
    let client = client().await;
    let created = create(
        &client,
        json!({
            "_id": "000000000000000000000000",
            "name": "Panel",
            "registrations": [{ "name": "Ada" }]
        }),
    )
    .await;

    assert_ne!(created["_id"], "000000000000000000000000");
    assert_eq!(created["registrations"], json!([{ "name": "Ada" }]));
}

#[rocket::async_test]
async fn create_rejects_mistyped_fields() {
    let client = client().await;
    let response = client
        .post("/events")
        .header(ContentType::JSON)
        .body(json!({ "title": ["not", "text"] }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().starts_with("Error creating event: "));
}

#[rocket::async_test]
async fn list_is_newest_first() {
    let client = client().await;
    for (title, date) in [("two", "2025-02-01"), ("one", "2025-01-01"), ("three", "2025-03-01")] {
        create(&client, json!({ "title": title, "date": date })).await;
    }

    let (status, body) = get_json(&client, "/events").await;
    assert_eq!(status, Status::Ok);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["three", "two", "one"]);
}

#[rocket::async_test]
async fn malformed_and_absent_ids_are_distinct() {
    let client = client().await;

    let (status, body) = get_json(&client, "/events/not-an-id").await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["detail"], "Invalid event ID format");

    let (status, body) = get_json(&client, "/events/65f1a2b3c4d5e6f708192a3b").await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["detail"], "Event not found");

    let (status, _) = get_json(&client, "/events/not-an-id/registrations").await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(
        register(&client, "65f1a2b3c4d5e6f708192a3b", json!({ "name": "Ada" })).await,
        Status::NotFound
    );

    let put = client
        .put("/events/not-an-id")
        .header(ContentType::JSON)
        .body(json!({ "title": "x" }).to_string())
        .dispatch()
        .await;
    assert_eq!(put.status(), Status::BadRequest);
    let body: Value = put.into_json().await.unwrap();
    assert_eq!(body["detail"], "Invalid event ID format");

    let delete = client.delete("/events/not-an-id").dispatch().await;
    assert_eq!(delete.status(), Status::BadRequest);

    assert_eq!(
        register(&client, "not-an-id", json!({ "name": "Ada" })).await,
        Status::BadRequest
    );
}

#[rocket::async_test]
async fn update_merges_and_protects_id() {
    let client = client().await;
    let created = create(&client, json!({ "title": "Draft", "room": "101", "date": "2025-01-01" })).await;
    let id = id_of(&created);
    assert_eq!(register(&client, &id, json!({ "name": "Ada" })).await, Status::Ok);

    let response = client
        .put(format!("/events/{id}"))
        .header(ContentType::JSON)
        .body(
            json!({
                "_id": "65f1a2b3c4d5e6f708192a3b",
                "title": "Final",
                "registrations": []
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated: Value = response.into_json().await.unwrap();

    assert_eq!(updated["_id"], json!(id));
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["room"], "101");
    assert_eq!(updated["date"], "2025-01-01");
    assert_eq!(updated["registrations"].as_array().unwrap().len(), 1);

    let unchanged = client
        .put(format!("/events/{id}"))
        .header(ContentType::JSON)
        .body("{}")
        .dispatch()
        .await;
    assert_eq!(unchanged.status(), Status::Ok);
    let unchanged: Value = unchanged.into_json().await.unwrap();
    assert_eq!(unchanged, updated);

    let missing = client
        .put("/events/65f1a2b3c4d5e6f708192a3b")
        .header(ContentType::JSON)
        .body("{}")
        .dispatch()
        .await;
    assert_eq!(missing.status(), Status::NotFound);
}

#[rocket::async_test]
async fn update_cannot_reach_into_registrations() {
    let client = client().await;
    let id = id_of(&create(&client, json!({ "title": "Gala" })).await);
    assert_eq!(register(&client, &id, json!({ "name": "Ada" })).await, Status::Ok);

    for key in ["registrations.0", "registrations.0.name", "_id.x"] {
        let response = client
            .put(format!("/events/{id}"))
            .header(ContentType::JSON)
            .body(json!({ key: "oops", "title": "changed" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest, "{key}");
        let body: Value = response.into_json().await.unwrap();
        assert!(body["detail"].as_str().unwrap().starts_with("Error updating event: "));
    }

    let (status, event) = get_json(&client, &format!("/events/{id}")).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(event["title"], "Gala");
    assert_eq!(event["registrations"][0]["name"], "Ada");

    let (status, _) = get_json(&client, "/dashboard-stats").await;
    assert_eq!(status, Status::Ok);
}

#[rocket::async_test]
async fn delete_twice() {
    let client = client().await;
    let id = id_of(&create(&client, json!({ "title": "Gone soon" })).await);

    let first = client.delete(format!("/events/{id}")).dispatch().await;
    assert_eq!(first.status(), Status::Ok);
    let body: Value = first.into_json().await.unwrap();
    assert_eq!(body["message"], "Event deleted successfully");

    let second = client.delete(format!("/events/{id}")).dispatch().await;
    assert_eq!(second.status(), Status::NotFound);
}

#[rocket::async_test]
async fn registration_timestamps() {
    let client = client().await;
    let id = id_of(&create(&client, json!({ "title": "Workshop" })).await);

    let before = Utc::now() - Duration::seconds(1);
    assert_eq!(register(&client, &id, json!({ "name": "Ada" })).await, Status::Ok);
    let after = Utc::now();
    assert_eq!(
        register(&client, &id, json!({ "name": "Grace", "timestamp": "2024-12-31T23:59:59" })).await,
        Status::Ok
    );
    // duplicates are accepted
    assert_eq!(register(&client, &id, json!({ "name": "Grace" })).await, Status::Ok);

    let (status, body) = get_json(&client, &format!("/events/{id}/registrations")).await;
    assert_eq!(status, Status::Ok);
    let registrations = body.as_array().unwrap();
    assert_eq!(registrations.len(), 3);

    let stamped: DateTime<Utc> = registrations[0]["timestamp"]
        .as_str()
        .unwrap()
        .parse()
        .expect("RFC 3339 timestamp");
    assert!(stamped >= before && stamped <= after);
    assert_eq!(registrations[1]["timestamp"], "2024-12-31T23:59:59");
}

#[rocket::async_test]
async fn registrations_listing_stringifies_nested_values() {
    let client = client().await;
    let id = id_of(&create(&client, json!({ "title": "Expo" })).await);
    let status = register(
        &client,
        &id,
        json!({ "name": "Ada", "year": 2, "guests": ["Bob"], "timestamp": null }),
    )
    .await;
    assert_eq!(status, Status::Ok);

    let (_, body) = get_json(&client, &format!("/events/{id}/registrations")).await;
    let registration = &body[0];
    assert_eq!(registration["name"], "Ada");
    assert_eq!(registration["year"], 2);
    assert_eq!(registration["timestamp"], Value::Null);
    assert!(registration["guests"].is_string());

    // the stored event still holds the array
    let (_, event) = get_json(&client, &format!("/events/{id}")).await;
    assert_eq!(event["registrations"][0]["guests"], json!(["Bob"]));
}

#[rocket::async_test]
async fn dashboard_stats_aggregate() {
    let client = client().await;
    let with_two = id_of(&create(&client, json!({ "title": "Two", "date": "2025-01-03" })).await);
    let with_five = id_of(&create(&client, json!({ "name": "Career Fair", "date": "2025-01-02" })).await);
    create(&client, json!({ "date": "2025-01-01" })).await;

    for _ in 0..2 {
        assert_eq!(register(&client, &with_two, json!({ "name": "x" })).await, Status::Ok);
    }
    for _ in 0..5 {
        assert_eq!(register(&client, &with_five, json!({ "name": "y" })).await, Status::Ok);
    }

    for uri in ["/dashboard-stats", "/organizer/summary"] {
        let (status, stats) = get_json(&client, uri).await;
        assert_eq!(status, Status::Ok);
        assert_eq!(stats["total_events"], 3);
        assert_eq!(stats["total_registrations"], 7);

        let summary = stats["event_summary"].as_array().unwrap();
        let counts: Vec<u64> = summary.iter().map(|s| s["count"].as_u64().unwrap()).collect();
        assert_eq!(counts, vec![5, 2, 0]);
        assert_eq!(summary[0]["id"], json!(with_five));
        assert_eq!(summary[0]["title"], "Career Fair");
        assert_eq!(summary[2]["title"], "Untitled Event");
    }
}

#[rocket::async_test]
async fn non_object_body_is_rejected() {
    let client = client().await;
    let response = client
        .post("/events")
        .header(ContentType::JSON)
        .body("[1, 2, 3]")
        .dispatch()
        .await;
    assert!(response.status().code >= 400 && response.status().code < 500);
    let body: Value = response.into_json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[rocket::async_test]
async fn cors_headers_for_allowed_origin_only() {
    let client = client().await;

    let allowed = client
        .get("/")
        .header(Header::new("Origin", "http://localhost:3000"))
        .dispatch()
        .await;
    assert_eq!(
        allowed.headers().get_one("Access-Control-Allow-Origin"),
        Some("http://localhost:3000")
    );

    let preflight = client
        .options("/events")
        .header(Header::new("Origin", "http://localhost:3000"))
        .dispatch()
        .await;
    assert_eq!(preflight.status(), Status::NoContent);

    let foreign = client
        .get("/")
        .header(Header::new("Origin", "https://evil.example"))
        .dispatch()
        .await;
    assert!(foreign.headers().get_one("Access-Control-Allow-Origin").is_none());
}
