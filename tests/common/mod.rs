#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use tokio::time::sleep;

use trip_planner_api::models::trip::TripContext;
use trip_planner_api::routes;
use trip_planner_api::services::ai_completion_service::{CompletionAdapter, CompletionError};
use trip_planner_api::services::itinerary_generation_service::{
    ItineraryGenerationConfig, ItineraryGenerator,
};
use trip_planner_api::state::AppState;

/// Adapter replying with a fixed text
pub struct CannedAdapter {
    pub response: String,
    pub calls: AtomicUsize,
}

impl CannedAdapter {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionAdapter for CannedAdapter {
    async fn complete(&self, _prompt: &str, _context: &TripContext) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Adapter that never answers in time
pub struct HangingAdapter;

#[async_trait]
impl CompletionAdapter for HangingAdapter {
    async fn complete(&self, _prompt: &str, _context: &TripContext) -> Result<String, CompletionError> {
        sleep(Duration::from_secs(30)).await;
        Ok("[]".to_string())
    }
}

pub struct FailingAdapter;

#[async_trait]
impl CompletionAdapter for FailingAdapter {
    async fn complete(&self, _prompt: &str, _context: &TripContext) -> Result<String, CompletionError> {
        Err(CompletionError::Response("quota exceeded".to_string()))
    }
}

pub fn short_timeout_config() -> ItineraryGenerationConfig {
    ItineraryGenerationConfig {
        ai_timeout: Duration::from_millis(50),
        ..ItineraryGenerationConfig::default()
    }
}

pub fn generator_with(adapter: Arc<dyn CompletionAdapter>) -> ItineraryGenerator {
    ItineraryGenerator::with_config(Some(adapter), short_timeout_config())
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Nine well-formed Paris activities, deliberately out of time order
pub fn paris_activities_json() -> String {
    json!([
        {"title": "Louvre Museum", "description": "Art", "time": "09:00", "location": "Rue de Rivoli", "category": "attraction", "priority": "high"},
        {"title": "Seine Cruise", "description": "Boat", "time": "20:00", "location": "Port de la Bourdonnais", "category": "activity", "priority": "medium"},
        {"title": "Café de Flore", "description": "Coffee", "time": "08:00", "location": "Saint-Germain", "category": "dining", "priority": "low"},
        {"title": "Eiffel Tower", "description": "Views", "time": "18:00", "location": "Champ de Mars", "category": "sightseeing", "priority": "high"},
        {"title": "Montmartre", "description": "Walk", "time": "14:00", "location": "Montmartre", "category": "activity", "priority": "medium"},
        {"title": "Orsay Museum", "description": "Impressionists", "time": "10:30", "location": "Left Bank", "category": "attraction", "priority": "high"},
        {"title": "Le Marais Lunch", "description": "Falafel", "time": "12:30", "location": "Le Marais", "category": "food", "priority": "medium"},
        {"title": "Galeries Lafayette", "description": "Shopping", "time": "16:00", "location": "Haussmann", "category": "shopping", "priority": "low"},
        {"title": "Moulin Rouge", "description": "Cabaret", "time": "21:30", "location": "Pigalle", "category": "entertainment", "priority": "low"}
    ])
    .to_string()
}

pub fn test_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(routes::configure)
}
