use actix_web::{web, HttpResponse, Responder};
use log::info;
use serde_json::json;

use crate::models::itinerary::ItineraryResponse;
use crate::models::trip::{TripContext, MAX_TRIP_DAYS};
use crate::services::day_distribution_service::DayDistributionScheduler;
use crate::services::places_service::enrich_with_coordinates;
use crate::state::AppState;

/*
    /api/itineraries/generate
*/
pub async fn generate(state: web::Data<AppState>, input: web::Json<TripContext>) -> impl Responder {
    let context = input.into_inner();
    if context.destination.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({"error": "destination is required"}));
    }
    if context.exceeds_max_trip_length() {
        return HttpResponse::BadRequest().json(json!({
            "error": format!("trips are limited to {} days", MAX_TRIP_DAYS)
        }));
    }

    let date_range = context.date_range();
    info!(
        "Generating itinerary for '{}' over {} days",
        context.destination,
        date_range.len()
    );

    let outcome = state.generator.generate_detailed(&context).await;

    let scheduler = DayDistributionScheduler::new(context.destination.clone());
    let mut schedule = scheduler.distribute(outcome.activities, &date_range);

    if let Some(places) = &state.places {
        enrich_with_coordinates(&mut schedule, places.clone()).await;
    }

    HttpResponse::Ok().json(ItineraryResponse::from_schedule(
        context.destination,
        outcome.source,
        outcome.fallback_reason,
        schedule,
    ))
}
