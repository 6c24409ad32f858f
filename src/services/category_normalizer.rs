//! Category Normalizer
//!
//! Every producer of [`GeneratedActivity`] (model output and the synthetic
//! catalog alike) goes through [`ActivityNormalizer::normalize`]. Nothing
//! downstream ever sees a raw category or priority string.

use chrono::NaiveTime;
use uuid::Uuid;

use crate::models::activity::{Category, GeneratedActivity, Priority, RawActivity};

const DEFAULT_HOUR: u32 = 12;

/// Map an arbitrary category label onto the fixed taxonomy.
pub fn normalize_category(label: &str) -> Category {
    let label = label.trim().to_lowercase();
    let mapped = match label.as_str() {
        "dining" | "food" => "restaurant",
        "sightseeing" | "tourism" => "attraction",
        "entertainment" => "nightlife",
        "accommodation" => "hotel",
        "travel" | "transportation" => "transport",
        other => other,
    };
    Category::from_member(mapped).unwrap_or(Category::Other)
}

pub fn normalize_priority(label: Option<&str>) -> Priority {
    match label.map(|p| p.trim().to_lowercase()).as_deref() {
        Some("high") => Priority::High,
        Some("low") => Priority::Low,
        _ => Priority::Medium,
    }
}

/// Parse the clock formats models tend to produce.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    let upper = value.to_uppercase();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .or_else(|_| NaiveTime::parse_from_str(&upper, "%I:%M %p"))
        .or_else(|_| NaiveTime::parse_from_str(&upper, "%I:%M%p"))
        .ok()
        .or_else(|| {
            // "9 AM" / "9pm" have no minutes, which chrono won't parse on its own
            let compact = upper.replace(' ', "");
            let (hour, is_pm) = if let Some(h) = compact.strip_suffix("AM") {
                (h, false)
            } else if let Some(h) = compact.strip_suffix("PM") {
                (h, true)
            } else {
                return None;
            };
            let hour: u32 = hour.parse().ok().filter(|h| (1..=12).contains(h))?;
            let hour = match (hour, is_pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            };
            NaiveTime::from_hms_opt(hour, 0, 0)
        })
}

pub fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Fills defaults that depend on the trip (the destination is the fallback location).
pub struct ActivityNormalizer<'a> {
    destination: &'a str,
}

impl<'a> ActivityNormalizer<'a> {
    pub fn new(destination: &'a str) -> Self {
        Self { destination }
    }

    /// `position` is 1-based and only used for the placeholder title.
    pub fn normalize(&self, raw: RawActivity, position: usize) -> GeneratedActivity {
        let category = raw
            .category
            .as_deref()
            .map(normalize_category)
            .unwrap_or(Category::Other);
        let priority = normalize_priority(raw.priority.as_deref());
        let time = raw
            .time
            .as_deref()
            .and_then(parse_clock_time)
            .unwrap_or_else(default_time);

        GeneratedActivity {
            id: Uuid::new_v4().to_string(),
            title: non_blank(raw.title).unwrap_or_else(|| format!("Activity {}", position)),
            description: non_blank(raw.description).unwrap_or_default(),
            time,
            location: non_blank(raw.location).unwrap_or_else(|| self.destination.to_string()),
            category,
            priority,
        }
    }

    pub fn normalize_all(&self, raw: Vec<RawActivity>) -> Vec<GeneratedActivity> {
        raw.into_iter()
            .enumerate()
            .map(|(i, activity)| self.normalize(activity, i + 1))
            .collect()
    }
}
