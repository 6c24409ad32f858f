use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn optional(enabled: bool, disabled_details: &str) -> Self {
        if enabled {
            ServiceStatus {
                status: "ok".to_string(),
                details: None,
            }
        } else {
            ServiceStatus {
                status: "disabled".to_string(),
                details: Some(disabled_details.to_string()),
            }
        }
    }
}

/*
    /health/details
*/
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // Both collaborators are optional, so a disabled one never degrades the service
    health.services.insert(
        "ai_completion".to_string(),
        ServiceStatus::optional(state.ai_enabled, "AI_API_KEY not set, synthetic itineraries only"),
    );
    health.services.insert(
        "places".to_string(),
        ServiceStatus::optional(state.places.is_some(), "GOOGLE_MAPS_API_KEY not set, no coordinates"),
    );

    HttpResponse::Ok().json(health)
}
