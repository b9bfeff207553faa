use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use tripdata_core::{Catalog, DestinationRecord, MemoryStore};
use tripdata_indexer::DestinationDataService;
use tripdata_places::LivePipeline;

const TOKEN: &str = "s3cret";

fn destination(id: &str, name: &str, kind: &str, rating: f64, tags: &[&str], description: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "state": "Rajasthan",
        "country": "India",
        "type": kind,
        "description": description,
        "coordinates": { "lat": 26.9, "lng": 75.8 },
        "tags": tags,
        "travelInfo": { "bestSeason": "Oct-Mar", "avgDuration": "2-3 days", "estimatedBudget": 30000, "accessibility": "Good" },
        "metadata": { "rating": rating }
    })
}

fn seed() -> Value {
    json!([
        destination("dest_jaipur", "Jaipur", "city", 4.6, &["heritage", "culture"], "The pink city of Rajasthan, home to the Amber Fort."),
        destination("dest_amber", "Amber Fort", "heritage", 4.8, &["heritage", "fort"], "Hilltop fort overlooking Maota lake near Jaipur."),
        destination("dest_thar", "Thar Desert", "region", 4.3, &["adventure"], "Dunes and camel safaris."),
    ])
}

async fn offline_service() -> Arc<DestinationDataService> {
    let pipeline = LivePipeline::new(None, Arc::new(Catalog::builtin()));
    let service = DestinationDataService::new(Arc::new(MemoryStore::new()), Arc::new(pipeline));
    let records: Vec<DestinationRecord> = serde_json::from_value(seed()).unwrap();
    service.store_destinations(&records).await.unwrap();
    Arc::new(service)
}

async fn app() -> Router {
    tripdata_server::build_app(offline_service().await, Some(TOKEN.into()))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn batch_request(token: Option<&str>, body: &Value) -> Request<Body> {
    let mut req = Request::post("/destinations/batch").header("content-type", "application/json");
    if let Some(t) = token {
        req = req.header("X-ADMIN-TOKEN", t);
    }
    req.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(app().await, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn search_returns_ranked_highlighted_hits() {
    let (status, json) = get_json(app().await, "/search?q=jaipur%20fort").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "jaipur fort");
    assert_eq!(json["total_hits"], 2);

    let hits = json["results"].as_array().unwrap();
    // Amber Fort: name+text on "fort" (15), text on "jaipur" (5), tag on "fort" (3).
    // Jaipur: name+text on "jaipur" (15), text on "fort" (5).
    assert_eq!(hits[0]["id"], "dest_amber");
    assert_eq!(hits[0]["score"], 23);
    assert_eq!(hits[0]["type"], "heritage");
    assert_eq!(hits[0]["rating"], 4.8);
    assert_eq!(hits[1]["id"], "dest_jaipur");
    assert_eq!(hits[1]["score"], 20);
    let snippet = hits[0]["snippet"].as_str().unwrap();
    assert!(snippet.contains("<em>fort</em>"));
    assert!(snippet.contains("<em>Jaipur</em>"));
}

#[tokio::test]
async fn search_applies_filters_and_k() {
    let (_, json) = get_json(app().await, "/search?q=jaipur%20fort&type=city").await;
    assert_eq!(json["total_hits"], 1);
    assert_eq!(json["results"][0]["id"], "dest_jaipur");

    let (_, json) = get_json(app().await, "/search?q=jaipur%20fort&min_rating=4.7").await;
    assert_eq!(json["total_hits"], 1);
    assert_eq!(json["results"][0]["id"], "dest_amber");

    let (_, json) = get_json(app().await, "/search?q=jaipur%20fort&tags=culture,adventure").await;
    assert_eq!(json["results"][0]["id"], "dest_jaipur");

    let (_, json) = get_json(app().await, "/search?q=jaipur%20fort&k=0").await;
    assert_eq!(json["total_hits"], 2);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_type_is_rejected() {
    let (status, json) = get_json(app().await, "/search?q=fort&type=castle").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("castle"));
}

#[tokio::test]
async fn destination_by_id_or_404() {
    let (status, json) = get_json(app().await, "/destination/dest_thar").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Thar Desert");
    assert_eq!(json["travelInfo"]["estimatedBudget"], 30000);

    let (status, json) = get_json(app().await, "/destination/dest_nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "error": "not found" }));
}

#[tokio::test]
async fn destinations_falls_back_offline_and_counts_caches() {
    let app = app().await;
    let (status, json) = get_json(app.clone(), "/destinations?q=Arunachal%20Pradesh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);
    assert_eq!(json["results"][0]["id"], "dest_arunachal");

    let (_, json) = get_json(app.clone(), "/destinations?q=Goa%20beaches").await;
    assert_eq!(json["total"], 0);

    let (_, stats) = get_json(app, "/stats").await;
    assert_eq!(stats["storageHealthy"], true);
    assert_eq!(stats["totalDestinations"], 4);
    assert_eq!(stats["totalCaches"], 1);
}

#[tokio::test]
async fn batch_requires_admin_token() {
    let body = json!([destination("dest_pushkar", "Pushkar", "temple", 4.4, &["pilgrimage"], "Lakeside temple town.")]);

    let unguarded = tripdata_server::build_app(offline_service().await, None);
    let (status, _) = send(unguarded, batch_request(Some(TOKEN), &body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(app().await, batch_request(Some("wrong"), &body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(app().await, batch_request(None, &body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn batch_stores_searchable_records() {
    let app = app().await;
    let body = json!([destination("dest_pushkar", "Pushkar", "temple", 4.4, &["pilgrimage"], "Lakeside temple town.")]);
    let (status, resp) = send(app.clone(), batch_request(Some(TOKEN), &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&resp).unwrap(), json!({ "stored": 1 }));

    let (_, json) = get_json(app, "/search?q=pushkar").await;
    assert_eq!(json["results"][0]["id"], "dest_pushkar");
}

#[tokio::test]
async fn total_hits_counts_matches_beyond_the_page() {
    let service = offline_service().await;
    let forts: Vec<DestinationRecord> = (0..12)
        .map(|i| destination(&format!("dest_fort_{i:02}"), &format!("Fort {i}"), "heritage", 4.0, &[], "Old walls."))
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();
    service.store_destinations(&forts).await.unwrap();
    let app = tripdata_server::build_app(service, None);

    // Twelve forts plus Amber Fort and Jaipur's description mention.
    let (_, json) = get_json(app, "/search?q=fort").await;
    assert_eq!(json["total_hits"], 14);
    assert_eq!(json["results"].as_array().unwrap().len(), 10);
}
