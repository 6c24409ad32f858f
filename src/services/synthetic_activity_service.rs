//! Synthetic Activity Generator
//!
//! Deterministic fallback used whenever the model cannot produce a usable
//! activity list. Activities come from a per-destination catalog when the
//! destination matches one, otherwise from generic templates filled with the
//! destination name. The selection is shaped by the trip's companions,
//! interests and budget, and always yields between
//! [`SYNTHETIC_MIN_ACTIVITIES`] and [`SYNTHETIC_MAX_ACTIVITIES`] activities.
//!
//! ## Destination matching policy
//! A catalog matches when, case-insensitively and ignoring surrounding
//! whitespace, the destination contains one of the catalog keys as whole
//! words ("Paris, France" → `paris`, but "Romania" is not `roma`), or a key
//! contains the destination ("York" → `new york`). The second direction only
//! applies to destinations of at least [`MIN_REVERSE_MATCH_LEN`] characters.
//! Catalogs are checked in table order and the first match wins.

use std::collections::HashSet;

use crate::models::activity::RawActivity;
use crate::models::trip::InterestTheme::{
    Adventure, Culture, Food, Nature, Nightlife, Relaxation, Shopping,
};
use crate::models::trip::{BudgetTier, CompanionKind, InterestTheme, TripContext};

pub const SYNTHETIC_MIN_ACTIVITIES: usize = 10;
pub const SYNTHETIC_MAX_ACTIVITIES: usize = 12;
pub const MIN_REVERSE_MATCH_LEN: usize = 3;

const DESTINATION_PLACEHOLDER: &str = "{destination}";

#[derive(Debug)]
pub struct CatalogEntry {
    pub title: &'static str,
    pub description: &'static str,
    pub time: &'static str,
    /// Empty means "the destination itself"
    pub location: &'static str,
    pub category: &'static str,
    pub priority: &'static str,
    pub themes: &'static [InterestTheme],
    pub romantic: bool,
}

#[derive(Debug)]
pub struct DestinationCatalog {
    pub keys: &'static [&'static str],
    pub entries: &'static [CatalogEntry],
}

const fn entry(
    title: &'static str,
    description: &'static str,
    time: &'static str,
    location: &'static str,
    category: &'static str,
    priority: &'static str,
    themes: &'static [InterestTheme],
) -> CatalogEntry {
    CatalogEntry {
        title,
        description,
        time,
        location,
        category,
        priority,
        themes,
        romantic: false,
    }
}

const fn romantic(mut e: CatalogEntry) -> CatalogEntry {
    e.romantic = true;
    e
}

static PARIS: [CatalogEntry; 12] = [
    entry("Louvre Museum", "See the Mona Lisa and the Winged Victory in the world's largest art museum.", "09:30", "Rue de Rivoli, Paris", "attraction", "high", &[Culture]),
    entry("Eiffel Tower Summit", "Ride up the iron lady for panoramic views over the Seine.", "17:30", "Champ de Mars, Paris", "attraction", "high", &[Culture]),
    entry("Croissants in Le Marais", "Breakfast at a neighbourhood boulangerie, then wander the medieval lanes.", "08:30", "Le Marais, Paris", "restaurant", "medium", &[Food]),
    entry("Musée d'Orsay", "Impressionist masterpieces inside a Beaux-Arts railway hall.", "10:00", "Rue de la Légion d'Honneur, Paris", "attraction", "medium", &[Culture]),
    entry("Montmartre Walk", "Climb to Sacré-Cœur and browse the painters at Place du Tertre.", "14:00", "Montmartre, Paris", "activity", "medium", &[Culture, Nature]),
    romantic(entry("Seine River Cruise", "An evening boat ride past Notre-Dame and the illuminated bridges.", "20:00", "Port de la Bourdonnais, Paris", "activity", "medium", &[Relaxation])),
    entry("Luxembourg Gardens", "Stroll the fountains and tree-lined paths of the Left Bank's favourite park.", "11:00", "Jardin du Luxembourg, Paris", "activity", "low", &[Nature, Relaxation]),
    entry("Galeries Lafayette", "Shop under the Art Nouveau dome and enjoy the free rooftop terrace.", "15:30", "Boulevard Haussmann, Paris", "shopping", "low", &[Shopping]),
    entry("Bistro Lunch in Saint-Germain", "Classic French dishes at a traditional Left Bank bistro.", "12:30", "Saint-Germain-des-Prés, Paris", "restaurant", "medium", &[Food]),
    entry("Marché des Enfants Rouges", "The city's oldest covered market, full of food stalls.", "12:00", "Rue de Bretagne, Paris", "restaurant", "low", &[Food, Shopping]),
    entry("Canal Saint-Martin Bike Ride", "Pedal along the canal locks and iron footbridges.", "16:00", "Canal Saint-Martin, Paris", "activity", "low", &[Adventure, Nature]),
    entry("Jazz Club in the Latin Quarter", "Live jazz in a vaulted cellar club.", "21:30", "Rue de la Huchette, Paris", "nightlife", "low", &[Nightlife]),
];

static TOKYO: [CatalogEntry; 12] = [
    entry("Senso-ji Temple", "Tokyo's oldest temple, approached through the Nakamise shopping street.", "09:00", "Asakusa, Tokyo", "attraction", "high", &[Culture]),
    entry("Tsukiji Outer Market Breakfast", "Fresh sushi and tamagoyaki from the market stalls.", "08:00", "Tsukiji, Tokyo", "restaurant", "high", &[Food]),
    entry("Meiji Shrine", "A forested Shinto shrine in the heart of the city.", "10:30", "Shibuya, Tokyo", "attraction", "medium", &[Culture, Nature]),
    entry("Shibuya Crossing & Sky", "Watch the famous scramble crossing from the rooftop deck.", "17:00", "Shibuya, Tokyo", "attraction", "medium", &[Culture]),
    entry("Harajuku & Takeshita Street", "Street fashion, crêpes and quirky boutiques.", "13:00", "Harajuku, Tokyo", "shopping", "medium", &[Shopping]),
    entry("teamLab Planets", "Walk through immersive digital art installations.", "15:00", "Toyosu, Tokyo", "activity", "medium", &[Culture, Adventure]),
    entry("Shinjuku Gyoen Garden", "Landscaped gardens mixing Japanese, English and French styles.", "11:00", "Shinjuku, Tokyo", "activity", "low", &[Nature, Relaxation]),
    entry("Ramen in Shinjuku", "A bowl of tonkotsu at a counter-seat ramen shop.", "12:30", "Shinjuku, Tokyo", "restaurant", "medium", &[Food]),
    romantic(entry("Tokyo Tower at Night", "City lights from the main deck of the orange landmark.", "19:30", "Minato, Tokyo", "attraction", "low", &[Relaxation])),
    entry("Akihabara Electronics Town", "Arcades, anime shops and retro game stores.", "14:00", "Akihabara, Tokyo", "shopping", "low", &[Shopping]),
    entry("Onsen Afternoon", "Unwind in a traditional hot spring bathhouse.", "16:30", "Odaiba, Tokyo", "activity", "low", &[Relaxation]),
    entry("Golden Gai Bar Hopping", "Tiny themed bars packed into narrow alleys.", "21:00", "Shinjuku, Tokyo", "nightlife", "low", &[Nightlife]),
];

static NEW_YORK: [CatalogEntry; 12] = [
    entry("Central Park Stroll", "Bethesda Terrace, Bow Bridge and the Mall.", "09:00", "Central Park, New York", "activity", "high", &[Nature, Relaxation]),
    entry("Metropolitan Museum of Art", "Five thousand years of art under one roof.", "10:30", "Fifth Avenue, New York", "attraction", "high", &[Culture]),
    entry("Statue of Liberty & Ellis Island", "Ferry out to Lady Liberty and the immigration museum.", "13:00", "Battery Park, New York", "attraction", "medium", &[Culture]),
    entry("Brooklyn Bridge Walk", "Cross the bridge on foot for skyline views.", "16:00", "Brooklyn Bridge, New York", "activity", "medium", &[Nature, Adventure]),
    entry("Bagels on the Lower East Side", "Hand-rolled bagels and lox at a classic deli.", "08:30", "Lower East Side, New York", "restaurant", "medium", &[Food]),
    entry("Chelsea Market Lunch", "Food hall inside a former biscuit factory.", "12:30", "Chelsea, New York", "restaurant", "medium", &[Food, Shopping]),
    entry("The High Line", "An elevated park built on an old rail line.", "15:00", "Chelsea, New York", "activity", "low", &[Nature]),
    romantic(entry("Top of the Rock at Sunset", "Watch the skyline light up from Rockefeller Center.", "19:00", "Rockefeller Center, New York", "attraction", "medium", &[Relaxation])),
    entry("SoHo Boutiques", "Cast-iron streets lined with independent shops.", "14:00", "SoHo, New York", "shopping", "low", &[Shopping]),
    entry("Broadway Show", "An evening performance in the Theater District.", "20:00", "Times Square, New York", "activity", "medium", &[Culture]),
    entry("Pizza in Brooklyn", "A coal-oven pie under the bridge in DUMBO.", "18:00", "DUMBO, New York", "restaurant", "low", &[Food]),
    entry("Greenwich Village Jazz", "Late set at a storied basement jazz club.", "22:00", "Greenwich Village, New York", "nightlife", "low", &[Nightlife]),
];

static ROME: [CatalogEntry; 12] = [
    entry("Colosseum & Roman Forum", "Walk through the arena and the ruins of ancient Rome.", "09:00", "Piazza del Colosseo, Rome", "attraction", "high", &[Culture]),
    entry("Vatican Museums & Sistine Chapel", "Michelangelo's ceiling and the papal collections.", "10:00", "Vatican City", "attraction", "high", &[Culture]),
    entry("Pantheon Visit", "The best-preserved temple of antiquity.", "11:30", "Piazza della Rotonda, Rome", "attraction", "medium", &[Culture]),
    entry("Trevi Fountain Coin Toss", "Toss a coin to guarantee a return to Rome.", "08:30", "Piazza di Trevi, Rome", "attraction", "medium", &[Culture]),
    entry("Trastevere Trattoria Dinner", "Cacio e pepe in a cobblestoned neighbourhood.", "19:30", "Trastevere, Rome", "restaurant", "medium", &[Food]),
    entry("Campo de' Fiori Market", "Morning market with produce, flowers and spices.", "09:30", "Campo de' Fiori, Rome", "shopping", "low", &[Food, Shopping]),
    entry("Villa Borghese Gardens", "Rent a rowboat on the lake or visit the Galleria.", "15:00", "Villa Borghese, Rome", "activity", "low", &[Nature, Relaxation]),
    entry("Gelato Tasting Walk", "Sample the city's best artisanal gelaterias.", "16:30", "Centro Storico, Rome", "restaurant", "low", &[Food]),
    romantic(entry("Sunset at the Spanish Steps", "Watch the evening light over Piazza di Spagna.", "18:30", "Piazza di Spagna, Rome", "attraction", "medium", &[Relaxation])),
    entry("Via del Corso Shopping", "Rome's main shopping street from Piazza Venezia to Piazza del Popolo.", "14:00", "Via del Corso, Rome", "shopping", "low", &[Shopping]),
    entry("Appian Way Bike Tour", "Cycle the ancient road past catacombs and aqueducts.", "10:30", "Via Appia Antica, Rome", "activity", "medium", &[Adventure, Nature]),
    entry("Aperitivo in Monti", "Evening drinks and small plates in a lively quarter.", "21:00", "Monti, Rome", "nightlife", "low", &[Nightlife, Food]),
];

static GENERIC: [CatalogEntry; 12] = [
    entry("Historic Centre Walking Tour", "Get your bearings with a guided walk through the old town of {destination}.", "09:30", "", "attraction", "high", &[Culture]),
    entry("Local Breakfast Café", "Start the day with a regional breakfast at a neighbourhood café.", "08:30", "", "restaurant", "medium", &[Food]),
    entry("City Museum", "Learn the history of {destination} at its main museum.", "11:00", "", "attraction", "medium", &[Culture]),
    entry("Lunch at a Local Favourite", "Try the signature dishes of {destination}.", "12:30", "", "restaurant", "medium", &[Food]),
    entry("Main Park or Waterfront", "Relax in the green heart of {destination}.", "14:30", "", "activity", "low", &[Nature, Relaxation]),
    entry("Central Market", "Browse stalls of local produce, crafts and street food.", "10:00", "", "shopping", "medium", &[Shopping, Food]),
    entry("Panoramic Viewpoint", "Take in the skyline of {destination} from its best lookout.", "17:30", "", "attraction", "medium", &[Nature]),
    romantic(entry("Sunset Dinner", "An unhurried dinner with a view.", "19:30", "", "restaurant", "medium", &[Food, Relaxation])),
    entry("Artisan & Souvenir Shops", "Pick up handmade goods from local makers.", "16:00", "", "shopping", "low", &[Shopping]),
    entry("Guided Bike Tour", "See more of {destination} on two wheels.", "10:30", "", "activity", "low", &[Adventure]),
    entry("Cultural Performance", "Catch a concert, dance or theatre show.", "20:00", "", "activity", "low", &[Culture]),
    entry("Evening Bar District", "Sample the local nightlife.", "21:30", "", "nightlife", "low", &[Nightlife]),
];

static BUDGET_EXTRAS: [CatalogEntry; 4] = [
    entry("Street Food Crawl", "Eat your way through the cheapest and tastiest local snacks.", "18:30", "", "restaurant", "medium", &[Food]),
    entry("Market Lunch with Locals", "A sit-down lunch at a busy market canteen.", "13:00", "", "restaurant", "medium", &[Food]),
    entry("Small-Group Guided Tour", "An expert-led tour of the highlights of {destination}.", "10:00", "", "attraction", "medium", &[Culture]),
    entry("Fine Dining & Spa Evening", "A spa session followed by a tasting menu.", "18:00", "", "restaurant", "medium", &[Food, Relaxation]),
];

static CATALOGS: [DestinationCatalog; 4] = [
    DestinationCatalog { keys: &["paris"], entries: &PARIS },
    DestinationCatalog { keys: &["tokyo"], entries: &TOKYO },
    DestinationCatalog { keys: &["new york", "nyc", "manhattan"], entries: &NEW_YORK },
    DestinationCatalog { keys: &["rome", "roma"], entries: &ROME },
];

/// Apply the destination matching policy described in the module docs.
pub fn match_catalog<'a>(
    catalogs: &'a [DestinationCatalog],
    destination: &str,
) -> Option<&'a DestinationCatalog> {
    let normalized = destination.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    catalogs.iter().find(|catalog| {
        catalog.keys.iter().any(|key| {
            contains_words(&normalized, key)
                || (normalized.chars().count() >= MIN_REVERSE_MATCH_LEN && key.contains(&normalized))
        })
    })
}

fn budget_extra(tier: BudgetTier) -> Option<&'static CatalogEntry> {
    match tier {
        BudgetTier::Unset => None,
        BudgetTier::Budget => Some(&BUDGET_EXTRAS[0]),
        BudgetTier::MidRange => Some(&BUDGET_EXTRAS[1]),
        BudgetTier::Comfort => Some(&BUDGET_EXTRAS[2]),
        BudgetTier::Luxury => Some(&BUDGET_EXTRAS[3]),
    }
}

pub struct SyntheticActivityGenerator {
    catalogs: &'static [DestinationCatalog],
}

impl Default for SyntheticActivityGenerator {
    fn default() -> Self {
        Self { catalogs: &CATALOGS }
    }
}

impl SyntheticActivityGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self, context: &TripContext) -> Vec<RawActivity> {
        let destination = match context.destination.trim() {
            "" => "your destination",
            d => d,
        };
        let companions = context.companion_kind();
        let themes = context.interest_themes();

        let catalog: &[CatalogEntry] = match_catalog(self.catalogs, destination)
            .map(|c| c.entries)
            .unwrap_or(&GENERIC[..]);

        let extra = budget_extra(context.budget);
        let capacity = SYNTHETIC_MAX_ACTIVITIES - usize::from(extra.is_some());

        let mut selected = rank_entries(catalog, companions, &themes);
        selected.truncate(capacity);

        // Padding only kicks in when filtering left a small catalog short
        if selected.len() < SYNTHETIC_MIN_ACTIVITIES {
            let taken: HashSet<&str> = selected.iter().map(|e| e.title).collect();
            let padding: Vec<&CatalogEntry> = rank_entries(&GENERIC, companions, &themes)
                .into_iter()
                .filter(|e| !taken.contains(e.title))
                .collect();
            let missing = capacity - selected.len();
            selected.extend(padding.into_iter().take(missing));
        }

        selected.extend(extra);

        selected
            .into_iter()
            .map(|entry| to_raw_activity(entry, destination, &themes))
            .collect()
    }
}

/// Order entries by preference score (stable, so catalog order breaks ties).
fn rank_entries<'a>(
    entries: &'a [CatalogEntry],
    companions: CompanionKind,
    themes: &[InterestTheme],
) -> Vec<&'a CatalogEntry> {
    let mut ranked: Vec<(&CatalogEntry, u8)> = entries
        .iter()
        .filter(|e| !(companions == CompanionKind::Family && e.category == "nightlife"))
        .map(|e| {
            let mut score = 0;
            if e.themes.iter().any(|t| themes.contains(t)) {
                score += 2;
            }
            if companions == CompanionKind::Couple && e.romantic {
                score += 1;
            }
            (e, score)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(e, _)| e).collect()
}

fn to_raw_activity(entry: &CatalogEntry, destination: &str, themes: &[InterestTheme]) -> RawActivity {
    let matches_interest = entry.themes.iter().any(|t| themes.contains(t));
    let location = if entry.location.is_empty() {
        destination.to_string()
    } else {
        entry.location.to_string()
    };

    RawActivity::new(entry.title.replace(DESTINATION_PLACEHOLDER, destination))
        .description(entry.description.replace(DESTINATION_PLACEHOLDER, destination))
        .time(entry.time)
        .location(location)
        .category(entry.category)
        .priority(if matches_interest { "high" } else { entry.priority })
}

/// `needle` occurs in `haystack` with no letter or digit directly around it.
fn contains_words(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
