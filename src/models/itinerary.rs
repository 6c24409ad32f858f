use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::activity::ScheduledItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySource {
    Ai,
    Synthetic,
}

/// Why the synthetic catalog was used instead of the model output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    AdapterUnavailable,
    AdapterError,
    Timeout,
    EmptyResponse,
    Unparseable,
    AllFiltered,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub items: Vec<ScheduledItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItineraryResponse {
    pub destination: String,
    pub source: ActivitySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
    pub total_activities: usize,
    pub days: Vec<DayPlan>,
}

impl ItineraryResponse {
    pub fn from_schedule(
        destination: String,
        source: ActivitySource,
        fallback_reason: Option<FallbackReason>,
        schedule: BTreeMap<NaiveDate, Vec<ScheduledItem>>,
    ) -> Self {
        let days: Vec<DayPlan> = schedule
            .into_iter()
            .map(|(date, items)| DayPlan { date, items })
            .collect();
        let total_activities = days.iter().map(|d| d.items.len()).sum();

        Self {
            destination,
            source,
            fallback_reason,
            total_activities,
            days,
        }
    }
}
