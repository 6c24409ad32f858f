use std::sync::{Arc, OnceLock};
use std::time::Duration;

use log::{debug, info, warn};
use regex::Regex;

use crate::config::DEFAULT_AI_TIMEOUT_MS;
use crate::models::activity::{GeneratedActivity, RawActivity};
use crate::models::itinerary::{ActivitySource, FallbackReason};
use crate::models::trip::TripContext;
use crate::services::ai_completion_service::CompletionAdapter;
use crate::services::category_normalizer::ActivityNormalizer;
use crate::services::response_recovery::ResponseRecoveryParser;
use crate::services::synthetic_activity_service::SyntheticActivityGenerator;

const MIN_REQUESTED_ACTIVITIES: usize = 8;
const MAX_REQUESTED_ACTIVITIES: usize = 12;

#[derive(Clone, Debug)]
pub struct ItineraryGenerationConfig {
    pub ai_timeout: Duration,
    pub min_requested_activities: usize,
    pub max_requested_activities: usize,
}

impl Default for ItineraryGenerationConfig {
    fn default() -> Self {
        Self {
            ai_timeout: Duration::from_millis(DEFAULT_AI_TIMEOUT_MS),
            min_requested_activities: MIN_REQUESTED_ACTIVITIES,
            max_requested_activities: MAX_REQUESTED_ACTIVITIES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub activities: Vec<GeneratedActivity>,
    pub source: ActivitySource,
    pub fallback_reason: Option<FallbackReason>,
}

fn excluded_keywords() -> &'static Regex {
    static EXCLUDED: OnceLock<Regex> = OnceLock::new();
    EXCLUDED.get_or_init(|| {
        Regex::new(
            r"(?i)\b(flights?|departures?|arrivals?|airports?|check-?ins?|check-?outs?|depart(s|ing|ed)?|arriv(e|es|ing|ed))\b",
        )
        .expect("excluded keyword pattern is valid")
    })
}

/// True when the activity is really inbound/outbound travel or lodging logistics.
pub fn is_travel_logistics(activity: &RawActivity) -> bool {
    let pattern = excluded_keywords();
    [activity.title.as_deref(), activity.description.as_deref()]
        .into_iter()
        .flatten()
        .any(|text| pattern.is_match(text))
}

pub struct ItineraryGenerator {
    adapter: Option<Arc<dyn CompletionAdapter>>,
    config: ItineraryGenerationConfig,
    parser: ResponseRecoveryParser,
    synthetic: SyntheticActivityGenerator,
}

impl ItineraryGenerator {
    /// `adapter` may be `None` when no AI backend is configured; generation then
    /// always uses the synthetic catalog.
    pub fn new(adapter: Option<Arc<dyn CompletionAdapter>>) -> Self {
        Self::with_config(adapter, ItineraryGenerationConfig::default())
    }

    pub fn with_config(
        adapter: Option<Arc<dyn CompletionAdapter>>,
        config: ItineraryGenerationConfig,
    ) -> Self {
        Self {
            adapter,
            config,
            parser: ResponseRecoveryParser::default(),
            synthetic: SyntheticActivityGenerator::default(),
        }
    }

    /// Generate the normalized activity list for a trip. Never fails.
    pub async fn generate(&self, context: &TripContext) -> Vec<GeneratedActivity> {
        self.generate_detailed(context).await.activities
    }

    /// Like [`generate`](Self::generate), also reporting where the activities came from.
    pub async fn generate_detailed(&self, context: &TripContext) -> GenerationOutcome {
        let (raw, source, fallback_reason) = match self.request_ai_activities(context).await {
            Ok(raw) => (raw, ActivitySource::Ai, None),
            Err(reason) => {
                warn!(
                    "Using synthetic activities for '{}': {:?}",
                    context.destination, reason
                );
                (self.synthetic_activities(context), ActivitySource::Synthetic, Some(reason))
            }
        };

        let normalizer = ActivityNormalizer::new(&context.destination);
        let activities = normalizer.normalize_all(raw);

        info!(
            "Generated {} activities for '{}' from {:?}",
            activities.len(),
            context.destination,
            source
        );

        GenerationOutcome {
            activities,
            source,
            fallback_reason,
        }
    }

    async fn request_ai_activities(&self, context: &TripContext) -> Result<Vec<RawActivity>, FallbackReason> {
        let adapter = self.adapter.as_ref().ok_or(FallbackReason::AdapterUnavailable)?;

        let prompt = self.build_prompt(context);
        debug!("Itinerary prompt:\n{}", prompt);

        let response = match tokio::time::timeout(self.config.ai_timeout, adapter.complete(&prompt, context)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Completion adapter failed: {}", e);
                return Err(FallbackReason::AdapterError);
            }
            Err(_) => {
                warn!(
                    "Completion adapter timed out after {}ms",
                    self.config.ai_timeout.as_millis()
                );
                return Err(FallbackReason::Timeout);
            }
        };

        if response.trim().is_empty() {
            return Err(FallbackReason::EmptyResponse);
        }
        debug!("Completion response:\n{}", response);

        let recovered = self.parser.recover(&response);
        if recovered.is_empty() {
            return Err(FallbackReason::Unparseable);
        }

        let kept = without_travel_logistics(recovered);
        if kept.is_empty() {
            return Err(FallbackReason::AllFiltered);
        }
        Ok(kept)
    }

    fn synthetic_activities(&self, context: &TripContext) -> Vec<RawActivity> {
        without_travel_logistics(self.synthetic.generate(context))
    }

    pub fn build_prompt(&self, context: &TripContext) -> String {
        let mut prompt = format!(
            "Plan activities for a trip to {}.\n",
            context.destination.trim()
        );

        let range = context.date_range();
        match (range.first(), range.last()) {
            (Some(start), Some(end)) => prompt.push_str(&format!(
                "Dates: {} to {} ({} days).\n",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d"),
                range.len()
            )),
            _ => prompt.push_str("Dates: not fixed yet.\n"),
        }

        let companions = context.companions.trim();
        if companions.is_empty() {
            prompt.push_str(&format!("Travelling {}.\n", context.companion_kind().describe()));
        } else {
            prompt.push_str(&format!(
                "Travelling {} ({}).\n",
                context.companion_kind().describe(),
                companions
            ));
        }

        let interests = context.interests.trim();
        if !interests.is_empty() {
            prompt.push_str(&format!("Interests: {}.\n", interests));
        }

        if let Some(narrative) = context.budget.narrative() {
            prompt.push_str(narrative);
            prompt.push('\n');
        }

        prompt.push_str(&format!(
            "\nRequirements:\n\
             - Suggest between {min} and {max} activities.\n\
             - Only include activities located in or around {destination}.\n\
             - Do NOT include flights, airport transfers, arrival or departure travel, or hotel check-in/check-out.\n\
             - Reply with a JSON array only. Each element must have: \
             \"title\", \"description\", \"time\" (HH:MM, 24h), \"location\", \
             \"category\" (one of activity, restaurant, hotel, transport, flight, attraction, shopping, nightlife, other), \
             \"priority\" (high, medium or low).\n",
            min = self.config.min_requested_activities,
            max = self.config.max_requested_activities,
            destination = context.destination.trim(),
        ));

        prompt
    }
}

fn without_travel_logistics(activities: Vec<RawActivity>) -> Vec<RawActivity> {
    let before = activities.len();
    let kept: Vec<RawActivity> = activities
        .into_iter()
        .filter(|a| !is_travel_logistics(a))
        .collect();
    if kept.len() < before {
        debug!("Dropped {} travel/lodging logistics activities", before - kept.len());
    }
    kept
}
