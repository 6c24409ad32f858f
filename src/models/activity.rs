use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Activity,
    Restaurant,
    Hotel,
    Transport,
    Flight,
    Attraction,
    Shopping,
    Nightlife,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Activity,
        Category::Restaurant,
        Category::Hotel,
        Category::Transport,
        Category::Flight,
        Category::Attraction,
        Category::Shopping,
        Category::Nightlife,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Activity => "activity",
            Category::Restaurant => "restaurant",
            Category::Hotel => "hotel",
            Category::Transport => "transport",
            Category::Flight => "flight",
            Category::Attraction => "attraction",
            Category::Shopping => "shopping",
            Category::Nightlife => "nightlife",
            Category::Other => "other",
        }
    }

    /// Exact (already lower-cased) member lookup, no synonyms
    pub fn from_member(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank, lower is scheduled first
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// Activity as recovered from model output or the synthetic catalog,
/// before any validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawActivity {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
}

// Accepted keys per field, most specific first
const TITLE_KEYS: &[&str] = &["title", "name", "activity"];
const DESCRIPTION_KEYS: &[&str] = &["description", "details"];
const TIME_KEYS: &[&str] = &["time", "start_time", "startTime"];
const LOCATION_KEYS: &[&str] = &["location", "place", "address"];
const CATEGORY_KEYS: &[&str] = &["category", "type"];
const PRIORITY_KEYS: &[&str] = &["priority"];

impl RawActivity {
    /// Build from a decoded JSON object. When several synonymous keys are
    /// present (e.g. `location` and `address`) the first usable one wins.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            title: first_loose_string(fields, TITLE_KEYS),
            description: first_loose_string(fields, DESCRIPTION_KEYS),
            time: first_loose_string(fields, TIME_KEYS),
            location: first_loose_string(fields, LOCATION_KEYS),
            category: first_loose_string(fields, CATEGORY_KEYS),
            priority: first_loose_string(fields, PRIORITY_KEYS),
        }
    }

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

impl<'de> Deserialize<'de> for RawActivity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Ok(RawActivity::from_fields(&fields))
    }
}

// Models sometimes emit numbers or booleans where text is expected
fn loose_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn first_loose_string(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find_map(loose_string)
}

/// A validated activity, not yet bound to a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedActivity {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub location: String,
    pub category: Category,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// An activity placed on a specific day. Only the day distribution
/// scheduler creates these; `order` is the rendering sequence within the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledItem {
    date: NaiveDate,
    order: u32,
    #[serde(flatten)]
    activity: GeneratedActivity,
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinates: Option<Coordinates>,
}

impl ScheduledItem {
    pub(crate) fn new(date: NaiveDate, order: u32, activity: GeneratedActivity) -> Self {
        Self {
            date,
            order,
            activity,
            coordinates: None,
        }
    }

    pub(crate) fn set_coordinates(&mut self, coordinates: Coordinates) {
        self.coordinates = Some(coordinates);
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn activity(&self) -> &GeneratedActivity {
        &self.activity
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }
}

/// `HH:MM` serde representation for clock times
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
