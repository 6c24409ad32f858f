use std::sync::Arc;

use crate::services::itinerary_generation_service::ItineraryGenerator;
use crate::services::places_service::PlacesLookup;

/// Shared, read-only services handed to every request
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ItineraryGenerator>,
    pub places: Option<Arc<dyn PlacesLookup>>,
    pub ai_enabled: bool,
}

impl AppState {
    pub fn new(generator: ItineraryGenerator, places: Option<Arc<dyn PlacesLookup>>, ai_enabled: bool) -> Self {
        Self {
            generator: Arc::new(generator),
            places,
            ai_enabled,
        }
    }
}
