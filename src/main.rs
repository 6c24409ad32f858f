use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};

use trip_planner_api::config::AppConfig;
use trip_planner_api::routes;
use trip_planner_api::services::ai_completion_service::{CompletionAdapter, HttpCompletionClient};
use trip_planner_api::services::itinerary_generation_service::{
    ItineraryGenerationConfig, ItineraryGenerator,
};
use trip_planner_api::services::places_service::{GeocodingService, PlacesLookup};
use trip_planner_api::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    // Try to initialize the AI adapter, but don't fail if the API key is missing
    let adapter: Option<Arc<dyn CompletionAdapter>> = match HttpCompletionClient::new(config.ai.clone()) {
        Ok(client) => {
            info!("AI completion enabled with model {}", config.ai.model);
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("AI completion not available: {}. Using synthetic itineraries.", e);
            None
        }
    };
    let ai_enabled = adapter.is_some();

    let places: Option<Arc<dyn PlacesLookup>> = match config.places_api_key.clone() {
        Some(key) => match GeocodingService::new(key) {
            Ok(service) => Some(Arc::new(service)),
            Err(e) => {
                warn!("Places lookup not available: {}", e);
                None
            }
        },
        None => {
            info!("GOOGLE_MAPS_API_KEY not set, itineraries will not carry coordinates");
            None
        }
    };

    let generator = ItineraryGenerator::with_config(
        adapter,
        ItineraryGenerationConfig {
            ai_timeout: config.ai.timeout,
            ..ItineraryGenerationConfig::default()
        },
    );
    let state = AppState::new(generator, places, ai_enabled);

    info!("Attempting to bind to {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind((config.host, config.port))?
    .run()
    .await
}
