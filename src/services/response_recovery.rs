//! Response Recovery Parser
//!
//! Model replies are free text. They may be clean JSON, JSON wrapped in a
//! markdown fence, JSON surrounded by prose, keyed by date instead of a flat
//! array, or slightly broken. Recovery runs an ordered chain of strategies and
//! stops at the first one that yields at least one activity:
//!
//! 1. [`FencedDirectDecode`]: strip the outer code fence and decode everything.
//! 2. [`BalancedSpanDecode`]: decode the first balanced `[...]` span, or the
//!    first balanced `{...}` span when the text has no array.
//! 3. [`AggressiveRepair`]: drop every fence marker, cut from the first opening
//!    bracket to the last closing one, and retry once more without trailing commas.
//!
//! Every strategy decodes through [`decode_activities`], which flattens objects
//! (e.g. `{"2025-06-01": [...], "2025-06-02": [...]}`) into a single list.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use serde_json::Value;

use crate::models::activity::RawActivity;

// Nested wrappers deeper than this are not worth chasing
const MAX_FLATTEN_DEPTH: usize = 4;

const ACTIVITY_KEYS: [&str; 4] = ["title", "name", "activity", "description"];

pub trait RecoveryStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when this strategy could not recover any activity.
    fn try_parse(&self, text: &str) -> Option<Vec<RawActivity>>;
}

/// Decode `candidate` as JSON and collect every activity-shaped object in it.
pub fn decode_activities(candidate: &str) -> Option<Vec<RawActivity>> {
    let value: Value = serde_json::from_str(candidate.trim()).ok()?;
    let mut activities = Vec::new();
    collect_activities(value, &mut activities, 0);
    if activities.is_empty() {
        None
    } else {
        Some(activities)
    }
}

fn looks_like_activity(object: &serde_json::Map<String, Value>) -> bool {
    ACTIVITY_KEYS
        .iter()
        .any(|key| matches!(object.get(*key), Some(Value::String(_))))
}

fn collect_activities(value: Value, out: &mut Vec<RawActivity>, depth: usize) {
    if depth > MAX_FLATTEN_DEPTH {
        return;
    }
    match value {
        Value::Array(items) => {
            for item in items {
                collect_activities(item, out, depth + 1);
            }
        }
        Value::Object(object) if looks_like_activity(&object) => {
            out.push(RawActivity::from_fields(&object));
        }
        Value::Object(object) => {
            for (_, nested) in object {
                collect_activities(nested, out, depth + 1);
            }
        }
        _ => {}
    }
}

/// Remove a leading ```` ```lang ```` line and a trailing ```` ``` ````.
fn strip_outer_fence(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Find the first span starting at `open` whose brackets balance,
/// ignoring brackets inside JSON string literals.
pub fn find_balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    for (start, _) in text.match_indices(open) {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, c) in text[start..].char_indices() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_string = false;
                }
                continue;
            }

            if c == '"' {
                in_string = true;
            } else if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
        }
    }
    None
}

pub struct FencedDirectDecode;

impl RecoveryStrategy for FencedDirectDecode {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn try_parse(&self, text: &str) -> Option<Vec<RawActivity>> {
        decode_activities(strip_outer_fence(text))
    }
}

pub struct BalancedSpanDecode;

impl RecoveryStrategy for BalancedSpanDecode {
    fn name(&self) -> &'static str {
        "balanced-span"
    }

    fn try_parse(&self, text: &str) -> Option<Vec<RawActivity>> {
        let span = find_balanced_span(text, '[', ']').or_else(|| find_balanced_span(text, '{', '}'))?;
        decode_activities(span)
    }
}

pub struct AggressiveRepair;

fn fence_marker() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("fence pattern is valid"))
}

fn trailing_comma() -> &'static Regex {
    static TRAILING: OnceLock<Regex> = OnceLock::new();
    TRAILING.get_or_init(|| Regex::new(r",\s*([\]}])").expect("trailing comma pattern is valid"))
}

impl RecoveryStrategy for AggressiveRepair {
    fn name(&self) -> &'static str {
        "aggressive-repair"
    }

    fn try_parse(&self, text: &str) -> Option<Vec<RawActivity>> {
        let unfenced = fence_marker().replace_all(text, "");
        let start = unfenced.find(|c: char| c == '[' || c == '{')?;
        let end = unfenced.rfind(|c: char| c == ']' || c == '}')?;
        if end <= start {
            return None;
        }
        let candidate = &unfenced[start..=end];

        decode_activities(candidate).or_else(|| {
            let repaired = trailing_comma().replace_all(candidate, "$1");
            decode_activities(&repaired)
        })
    }
}

pub struct ResponseRecoveryParser {
    strategies: Vec<Box<dyn RecoveryStrategy>>,
}

impl Default for ResponseRecoveryParser {
    fn default() -> Self {
        Self {
            strategies: vec![
                Box::new(FencedDirectDecode),
                Box::new(BalancedSpanDecode),
                Box::new(AggressiveRepair),
            ],
        }
    }
}

impl ResponseRecoveryParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategies(strategies: Vec<Box<dyn RecoveryStrategy>>) -> Self {
        Self { strategies }
    }

    /// Best-effort extraction; an empty result means nothing was salvageable.
    pub fn recover(&self, raw_text: &str) -> Vec<RawActivity> {
        if raw_text.trim().is_empty() {
            return Vec::new();
        }

        for strategy in &self.strategies {
            if let Some(activities) = strategy.try_parse(raw_text) {
                debug!(
                    "Recovered {} activities with '{}' strategy",
                    activities.len(),
                    strategy.name()
                );
                return activities;
            }
            debug!("Recovery strategy '{}' found nothing", strategy.name());
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARRAY: &str = r#"[
        {"title": "Louvre Museum", "time": "09:00", "category": "attraction", "priority": "high"},
        {"title": "Lunch at Le Marais", "time": "12:30", "category": "dining"}
    ]"#;

    fn titles(activities: &[RawActivity]) -> Vec<String> {
        activities
            .iter()
            .map(|a| a.title.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_direct_decode_with_fence() {
        let text = format!("```json\n{}\n```", ARRAY);
        let recovered = FencedDirectDecode.try_parse(&text).unwrap();
        assert_eq!(titles(&recovered), vec!["Louvre Museum", "Lunch at Le Marais"]);
    }

    #[test]
    fn test_direct_decode_rejects_prose() {
        let text = format!("Sure! Here is your plan:\n{}", ARRAY);
        assert!(FencedDirectDecode.try_parse(&text).is_none());
    }

    #[test]
    fn test_balanced_span_ignores_brackets_in_strings() {
        let text = r#"Plan below. [{"title": "Bar [live jazz]", "description": "a ] b"}] Enjoy!"#;
        let span = find_balanced_span(text, '[', ']').unwrap();
        assert!(span.starts_with("[{"));
        assert!(span.ends_with("}]"));

        let recovered = BalancedSpanDecode.try_parse(text).unwrap();
        assert_eq!(titles(&recovered), vec!["Bar [live jazz]"]);
    }

    #[test]
    fn test_balanced_span_falls_back_to_object() {
        let text = r#"Here you go: {"title": "Eiffel Tower", "time": "18:00"} -- have fun"#;
        let recovered = BalancedSpanDecode.try_parse(text).unwrap();
        assert_eq!(titles(&recovered), vec!["Eiffel Tower"]);
    }

    #[test]
    fn test_date_keyed_object_is_flattened() {
        let text = r#"{
            "2025-06-01": [{"title": "A"}, {"title": "B"}],
            "2025-06-02": [{"title": "C"}]
        }"#;
        let recovered = decode_activities(text).unwrap();
        assert_eq!(recovered.len(), 3);

        let wrapped = r#"{"itinerary": {"activities": [{"name": "D"}]}}"#;
        assert_eq!(titles(&decode_activities(wrapped).unwrap()), vec!["D"]);
    }

    #[test]
    fn test_aggressive_repair_handles_trailing_commas_and_inner_fences() {
        let text = "Intro text ```json [{\"title\": \"Canal tour\",}, {\"title\": \"Market\"},] ``` outro";
        assert!(FencedDirectDecode.try_parse(text).is_none());
        assert!(BalancedSpanDecode.try_parse(text).is_none());

        let recovered = AggressiveRepair.try_parse(text).unwrap();
        assert_eq!(titles(&recovered), vec!["Canal tour", "Market"]);
    }

    #[test]
    fn test_non_object_elements_are_skipped() {
        let recovered = decode_activities(r#"[1, "two", null, {"title": "Three"}]"#).unwrap();
        assert_eq!(titles(&recovered), vec!["Three"]);
        assert!(decode_activities("[1, 2, 3]").is_none());
    }

    #[test]
    fn test_recover_keeps_objects_with_synonymous_keys() {
        let parser = ResponseRecoveryParser::new();
        let text = r#"[
            {"title": "Louvre", "name": "Louvre Museum"},
            {"title": "Seine walk", "location": "Quai", "address": "Quai de Conti"},
            {"title": "Bistro", "category": "dining", "type": "restaurant"},
            {"title": "Plain"}
        ]"#;

        let recovered = parser.recover(text);
        assert_eq!(titles(&recovered), vec!["Louvre", "Seine walk", "Bistro", "Plain"]);
        assert_eq!(recovered[1].location.as_deref(), Some("Quai"));
        assert_eq!(recovered[2].category.as_deref(), Some("dining"));

        let only_duplicates = r#"[{"title": "Louvre", "name": "Louvre Museum"}]"#;
        assert_eq!(titles(&parser.recover(only_duplicates)), vec!["Louvre"]);
    }

    #[test]
    fn test_recover_garbage_returns_empty() {
        let parser = ResponseRecoveryParser::new();
        let inputs = [
            "",
            "   ",
            "I'm sorry, I can't help with that.",
            "[[[[",
            "]]}}{{[[",
            "{\"title\": ",
            "```",
            "``` ```json ```",
            "[\"unterminated string]",
            "\u{feff}\u{0}\u{7f}",
            "}{",
            "ñ[é{ü",
        ];
        for input in inputs {
            assert!(parser.recover(input).is_empty(), "input {input:?}");
        }
    }

    #[test]
    fn test_recover_prose_and_fence_matches_isolated_array() {
        let parser = ResponseRecoveryParser::new();
        let text = format!(
            "Absolutely! Below is a plan for Paris.\n\n```json\n{}\n```\n\nLet me know if you want changes.",
            ARRAY
        );
        let isolated = decode_activities(ARRAY).unwrap();
        assert_eq!(parser.recover(&text), isolated);
    }
}
