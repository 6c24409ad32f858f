pub mod ai_completion_service;
pub mod category_normalizer;
pub mod day_distribution_service;
pub mod itinerary_generation_service;
pub mod places_service;
pub mod response_recovery;
pub mod synthetic_activity_service;
