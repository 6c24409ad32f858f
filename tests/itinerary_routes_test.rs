mod common;

use std::sync::Arc;

use actix_web::{test, web};
use async_trait::async_trait;
use serde_json::{json, Value};

use trip_planner_api::models::activity::Coordinates;
use trip_planner_api::models::trip::MAX_TRIP_DAYS;
use trip_planner_api::services::itinerary_generation_service::ItineraryGenerator;
use trip_planner_api::services::places_service::{PlacesError, PlacesLookup};
use trip_planner_api::state::AppState;

use common::{generator_with, paris_activities_json, test_app, CannedAdapter};

struct EverywhereIsParis;

#[async_trait]
impl PlacesLookup for EverywhereIsParis {
    async fn lookup(&self, _location: &str) -> Result<Option<Coordinates>, PlacesError> {
        Ok(Some(Coordinates {
            lat: 48.8566,
            lng: 2.3522,
        }))
    }
}

fn ai_state() -> AppState {
    let adapter = Arc::new(CannedAdapter::new(paris_activities_json()));
    AppState::new(generator_with(adapter), None, true)
}

fn synthetic_state() -> AppState {
    AppState::new(ItineraryGenerator::new(None), None, false)
}

#[actix_rt::test]
async fn test_health_check() {
    let app = test::init_service(test_app(synthetic_state())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    assert_eq!(body, web::Bytes::from_static(b"OK"));
}

#[actix_rt::test]
async fn test_health_details_reports_disabled_collaborators() {
    let app = test::init_service(test_app(synthetic_state())).await;

    let req = test::TestRequest::get().uri("/health/details").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"]["ai_completion"]["status"], "disabled");
    assert_eq!(body["services"]["places"]["status"], "disabled");
}

#[actix_rt::test]
async fn test_generate_distributes_ai_activities() {
    let app = test::init_service(test_app(ai_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .set_json(json!({
            "destination": "Paris",
            "start_date": "2025-06-01",
            "end_date": "2025-06-03",
            "companions": "my partner",
            "interests": "art and food",
            "budget": "mid-range"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["destination"], "Paris");
    assert_eq!(body["source"], "ai");
    assert!(body.get("fallback_reason").is_none());
    assert_eq!(body["total_activities"], 9);

    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["date"], "2025-06-01");
    assert_eq!(days[2]["date"], "2025-06-03");

    let first = &days[0]["items"][0];
    assert_eq!(first["order"], 1);
    assert_eq!(first["title"], "Louvre Museum");
    assert_eq!(first["time"], "09:00");
    assert_eq!(first["category"], "attraction");
    assert!(first.get("coordinates").is_none());
}

#[actix_rt::test]
async fn test_generate_falls_back_without_adapter() {
    let app = test::init_service(test_app(synthetic_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .set_json(json!({
            "destination": "Tokyo",
            "start_date": "2025-10-10T00:00:00Z",
            "end_date": "2025-10-13",
            "budget": 42
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["source"], "synthetic");
    assert_eq!(body["fallback_reason"], "adapter_unavailable");
    assert_eq!(body["days"].as_array().unwrap().len(), 4);
    assert!(body["total_activities"].as_u64().unwrap() >= 10);
}

#[actix_rt::test]
async fn test_generate_with_more_days_than_activities_adds_placeholders() {
    let response = json!([
        {"title": "Sagrada Familia", "time": "10:00", "priority": "high"},
        {"title": "Park Güell", "time": "15:00"}
    ])
    .to_string();
    let state = AppState::new(generator_with(Arc::new(CannedAdapter::new(response))), None, true);
    let app = test::init_service(test_app(state)).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .set_json(json!({
            "destination": "Barcelona",
            "start_date": "2025-04-01",
            "end_date": "2025-04-05"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 5);
    for day in days {
        assert_eq!(day["items"].as_array().unwrap().len(), 1);
    }
    assert_eq!(days[0]["items"][0]["title"], "Sagrada Familia");
    assert_eq!(days[4]["items"][0]["title"], "Free exploration");
    assert_eq!(days[4]["items"][0]["location"], "Barcelona");
}

#[actix_rt::test]
async fn test_generate_attaches_coordinates_when_places_available() {
    let adapter = Arc::new(CannedAdapter::new(paris_activities_json()));
    let places: Arc<dyn PlacesLookup> = Arc::new(EverywhereIsParis);
    let state = AppState::new(generator_with(adapter), Some(places), true);
    let app = test::init_service(test_app(state)).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .set_json(json!({
            "destination": "Paris",
            "start_date": "2025-06-01",
            "end_date": "2025-06-01"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let items = body["days"][0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 9);
    assert!(items.iter().all(|item| item["coordinates"]["lat"] == 48.8566));
}

#[actix_rt::test]
async fn test_generate_rejects_blank_destination() {
    let app = test::init_service(test_app(synthetic_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .set_json(json!({"destination": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "destination is required");
}

#[actix_rt::test]
async fn test_generate_rejects_overlong_trip() {
    let app = test::init_service(test_app(synthetic_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .set_json(json!({
            "destination": "Lisbon",
            "start_date": "1000-01-01",
            "end_date": "2999-12-31"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], format!("trips are limited to {} days", MAX_TRIP_DAYS));
}

#[actix_rt::test]
async fn test_generate_without_dates_returns_no_days() {
    let app = test::init_service(test_app(synthetic_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .set_json(json!({"destination": "Rome", "start_date": "soon"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["days"], json!([]));
    assert_eq!(body["total_activities"], 0);
}
