use std::sync::OnceLock;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Longest trip, in days, that gets a day-by-day schedule
pub const MAX_TRIP_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetTier {
    #[default]
    Unset,
    Budget,
    MidRange,
    Comfort,
    Luxury,
}

impl BudgetTier {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "budget" => BudgetTier::Budget,
            "mid-range" | "midrange" | "mid range" | "moderate" => BudgetTier::MidRange,
            "comfort" => BudgetTier::Comfort,
            "luxury" => BudgetTier::Luxury,
            _ => BudgetTier::Unset,
        }
    }

    /// Guidance embedded in the generation prompt for this tier
    pub fn narrative(&self) -> Option<&'static str> {
        match self {
            BudgetTier::Unset => None,
            BudgetTier::Budget => Some(
                "The traveller is on a tight budget: favour free attractions, parks, walking tours, street food and public transport.",
            ),
            BudgetTier::MidRange => Some(
                "The traveller has a moderate budget: mix free sights with a few paid attractions and casual sit-down restaurants.",
            ),
            BudgetTier::Comfort => Some(
                "The traveller wants a comfortable trip: include guided tours, well-reviewed restaurants and skip-the-line tickets where useful.",
            ),
            BudgetTier::Luxury => Some(
                "The traveller has a luxury budget: include fine dining, private or small-group experiences, spas and premium venues.",
            ),
        }
    }
}

// Unknown or non-string budget values degrade to `Unset` instead of failing the request
impl<'de> Deserialize<'de> for BudgetTier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
        match value {
            Some(serde_json::Value::String(s)) => Ok(BudgetTier::from_label(&s)),
            _ => Ok(BudgetTier::Unset),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanionKind {
    Solo,
    Couple,
    Family,
    Friends,
    Unspecified,
}

impl CompanionKind {
    /// Heuristic classification of the free-text companions descriptor.
    ///
    /// Checked in order family, couple, friends, solo so that e.g.
    /// "my wife and two kids" counts as a family trip.
    pub fn classify(descriptor: &str) -> Self {
        let [family, couple, friends, solo] = companion_patterns();

        if family.is_match(descriptor) {
            CompanionKind::Family
        } else if couple.is_match(descriptor) {
            CompanionKind::Couple
        } else if friends.is_match(descriptor) {
            CompanionKind::Friends
        } else if solo.is_match(descriptor) {
            CompanionKind::Solo
        } else {
            CompanionKind::Unspecified
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            CompanionKind::Solo => "solo",
            CompanionKind::Couple => "as a couple",
            CompanionKind::Family => "as a family with children",
            CompanionKind::Friends => "with a group of friends",
            CompanionKind::Unspecified => "with unspecified companions",
        }
    }
}

// Whole words only, so "person" is not a "son" and "party" is not "art"
fn word_pattern(alternatives: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b({})\b", alternatives)).expect("keyword pattern is valid")
}

fn companion_patterns() -> &'static [Regex; 4] {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            word_pattern("kids?|child|children|family|sons?|daughters?|toddlers?|baby|babies"),
            word_pattern("partner|spouse|wife|husband|girlfriend|boyfriend|couple|honeymoon"),
            word_pattern("friends?|group|buddies|colleagues?"),
            word_pattern("solo|alone|myself|just me"),
        ]
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterestTheme {
    Food,
    Culture,
    Nature,
    Shopping,
    Nightlife,
    Adventure,
    Relaxation,
}

impl InterestTheme {
    pub const ALL: [InterestTheme; 7] = [
        InterestTheme::Food,
        InterestTheme::Culture,
        InterestTheme::Nature,
        InterestTheme::Shopping,
        InterestTheme::Nightlife,
        InterestTheme::Adventure,
        InterestTheme::Relaxation,
    ];

    fn keywords(&self) -> &'static str {
        match self {
            InterestTheme::Food => "food|foodie|cuisine|culinary|eat|eating|restaurants?|wine|dining",
            InterestTheme::Culture => {
                "culture|cultural|history|historic|historical|museums?|art|arts|architecture|heritage|temples?"
            }
            InterestTheme::Nature => "nature|parks?|gardens?|outdoors?|hiking|hikes?|beach|beaches|scenery",
            InterestTheme::Shopping => "shopping|markets?|boutiques?|fashion|souvenirs?",
            InterestTheme::Nightlife => "nightlife|bars?|clubs?|clubbing|party|parties|music|cocktails?",
            InterestTheme::Adventure => "adventures?|sports?|bike|biking|cycling|kayak|kayaking|climb|climbing",
            InterestTheme::Relaxation => "relax|relaxing|relaxation|spa|spas|wellness|slow|chill",
        }
    }

    fn pattern(&self) -> &'static Regex {
        static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
        let patterns = PATTERNS.get_or_init(|| {
            InterestTheme::ALL
                .iter()
                .map(|theme| word_pattern(theme.keywords()))
                .collect()
        });
        // ALL lists the variants in declaration order
        &patterns[*self as usize]
    }

    /// Themes mentioned anywhere in the interests descriptor
    pub fn detect(descriptor: &str) -> Vec<InterestTheme> {
        Self::ALL
            .iter()
            .copied()
            .filter(|theme| theme.pattern().is_match(descriptor))
            .collect()
    }
}

/// Immutable description of the trip an itinerary is generated for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripContext {
    pub destination: String,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub companions: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub budget: BudgetTier,
}

impl TripContext {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_companions(mut self, companions: impl Into<String>) -> Self {
        self.companions = companions.into();
        self
    }

    pub fn with_interests(mut self, interests: impl Into<String>) -> Self {
        self.interests = interests.into();
        self
    }

    pub fn with_budget(mut self, budget: BudgetTier) -> Self {
        self.budget = budget;
        self
    }

    pub fn companion_kind(&self) -> CompanionKind {
        CompanionKind::classify(&self.companions)
    }

    pub fn interest_themes(&self) -> Vec<InterestTheme> {
        InterestTheme::detect(&self.interests)
    }

    /// True when both dates are set, in order, and cover more than [`MAX_TRIP_DAYS`] dates.
    pub fn exceeds_max_trip_length(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= end && (end - start).num_days() >= MAX_TRIP_DAYS,
            _ => false,
        }
    }

    pub fn date_range(&self) -> DateRange {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            _ => DateRange::empty(),
        }
    }
}

/// Parse a calendar date from the formats clients send: plain dates or
/// full datetimes (time part dropped).
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
                .map(|dt| dt.date())
                .ok()
        })
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.date_naive())
                .ok()
        })
}

// Malformed dates become `None` so the request degrades to an empty range
fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        Some(serde_json::Value::String(s)) => Ok(parse_calendar_date(&s)),
        _ => Ok(None),
    }
}

/// Inclusive, contiguous run of calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateRange {
    dates: Vec<NaiveDate>,
}

impl DateRange {
    /// Reversed ranges and ranges longer than [`MAX_TRIP_DAYS`] are empty.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start > end {
            return Self::empty();
        }
        let days = (end - start).num_days();
        if days >= MAX_TRIP_DAYS {
            return Self::empty();
        }
        let dates = (0..=days).map(|offset| start + Duration::days(offset)).collect();
        Self { dates }
    }

    pub fn empty() -> Self {
        Self { dates: Vec::new() }
    }

    /// Build a range from optional date strings; anything absent or malformed yields an empty range
    pub fn from_strings(start: Option<&str>, end: Option<&str>) -> Self {
        match (start.and_then(parse_calendar_date), end.and_then(parse_calendar_date)) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Self::empty(),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(date(2025, 5, 1), date(2025, 5, 3));
        assert_eq!(range.dates(), &[date(2025, 5, 1), date(2025, 5, 2), date(2025, 5, 3)]);

        let single = DateRange::new(date(2025, 5, 1), date(2025, 5, 1));
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_date_range_reversed_or_malformed_is_empty() {
        assert!(DateRange::new(date(2025, 5, 3), date(2025, 5, 1)).is_empty());
        assert!(DateRange::from_strings(Some("not a date"), Some("2025-05-01")).is_empty());
        assert!(DateRange::from_strings(None, Some("2025-05-01")).is_empty());
        assert_eq!(
            DateRange::from_strings(Some("2025-05-01T09:00:00"), Some("2025-05-02")).len(),
            2
        );
    }

    #[test]
    fn test_date_range_longer_than_max_is_empty() {
        let start = date(2025, 1, 1);
        let last_allowed = start + Duration::days(MAX_TRIP_DAYS - 1);
        assert_eq!(DateRange::new(start, last_allowed).len(), MAX_TRIP_DAYS as usize);
        assert!(DateRange::new(start, last_allowed + Duration::days(1)).is_empty());

        let context: TripContext = serde_json::from_value(serde_json::json!({
            "destination": "Anywhere",
            "start_date": "1000-01-01",
            "end_date": "2999-12-31"
        }))
        .unwrap();
        assert!(context.exceeds_max_trip_length());
        assert!(context.date_range().is_empty());

        let short = TripContext::new("Anywhere").with_dates(start, last_allowed);
        assert!(!short.exceeds_max_trip_length());
        assert!(!TripContext::new("Anywhere").with_dates(last_allowed, start).exceeds_max_trip_length());
    }

    #[test]
    fn test_budget_tier_labels() {
        assert_eq!(BudgetTier::from_label("Mid-Range"), BudgetTier::MidRange);
        assert_eq!(BudgetTier::from_label("LUXURY"), BudgetTier::Luxury);
        assert_eq!(BudgetTier::from_label("whatever"), BudgetTier::Unset);
        assert!(BudgetTier::Unset.narrative().is_none());
        assert!(BudgetTier::Budget.narrative().is_some());
    }

    #[test]
    fn test_companion_classification() {
        assert_eq!(CompanionKind::classify("My wife and our two kids"), CompanionKind::Family);
        assert_eq!(CompanionKind::classify("with my partner"), CompanionKind::Couple);
        assert_eq!(CompanionKind::classify("3 friends"), CompanionKind::Friends);
        assert_eq!(CompanionKind::classify("Just me, travelling solo"), CompanionKind::Solo);
        assert_eq!(CompanionKind::classify(""), CompanionKind::Unspecified);
    }

    #[test]
    fn test_companion_classification_matches_whole_words() {
        assert_eq!(CompanionKind::classify("just one person"), CompanionKind::Unspecified);
        assert_eq!(CompanionKind::classify("with my friend Jason"), CompanionKind::Friends);
        assert_eq!(CompanionKind::classify("off-season, for a good reason"), CompanionKind::Unspecified);
        assert_eq!(CompanionKind::classify("our son"), CompanionKind::Family);
    }

    #[test]
    fn test_interest_detection_ignores_partial_words() {
        let themes = InterestTheme::detect("A great start, a barbecue and the theatre");
        assert!(themes.is_empty(), "{themes:?}");

        let themes = InterestTheme::detect("Party at a rooftop BAR");
        assert_eq!(themes, vec![InterestTheme::Nightlife]);
    }

    #[test]
    fn test_interest_detection() {
        let themes = InterestTheme::detect("Art museums, local food and a bit of shopping");
        assert!(themes.contains(&InterestTheme::Culture));
        assert!(themes.contains(&InterestTheme::Food));
        assert!(themes.contains(&InterestTheme::Shopping));
        assert!(!themes.contains(&InterestTheme::Nightlife));
    }

    #[test]
    fn test_trip_context_lenient_deserialization() {
        let context: TripContext = serde_json::from_value(serde_json::json!({
            "destination": "Paris",
            "start_date": "2025-06-01",
            "end_date": "garbage",
            "budget": 42
        }))
        .unwrap();

        assert_eq!(context.start_date, Some(date(2025, 6, 1)));
        assert_eq!(context.end_date, None);
        assert_eq!(context.budget, BudgetTier::Unset);
        assert!(context.date_range().is_empty());
    }
}
