use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DEFAULT_AI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_AI_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_AI_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub endpoint: Url,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: Url::parse(DEFAULT_AI_ENDPOINT).expect("default endpoint is a valid URL"),
            model: DEFAULT_AI_MODEL.to_string(),
            temperature: DEFAULT_AI_TEMPERATURE,
            timeout: Duration::from_millis(DEFAULT_AI_TIMEOUT_MS),
        }
    }
}

impl AiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let endpoint = match non_empty_var("AI_ENDPOINT") {
            Some(raw) => Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                name: "AI_ENDPOINT",
                reason: e.to_string(),
            })?,
            None => defaults.endpoint,
        };

        Ok(Self {
            api_key: non_empty_var("AI_API_KEY"),
            endpoint,
            model: non_empty_var("AI_MODEL").unwrap_or(defaults.model),
            temperature: parsed_var("AI_TEMPERATURE").unwrap_or(defaults.temperature),
            timeout: parsed_var("AI_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub ai: AiConfig,
    pub places_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: non_empty_var("HOST").unwrap_or_else(|| HOST.to_string()),
            port: parsed_var("PORT").unwrap_or(PORT),
            ai: AiConfig::from_env()?,
            places_api_key: non_empty_var("GOOGLE_MAPS_API_KEY"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    non_empty_var(name).and_then(|v| v.parse().ok())
}
