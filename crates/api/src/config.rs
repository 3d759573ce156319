use std::env;
use std::str::FromStr;
use std::time::Duration;

use wayfarer_planner::{GenerationConfig, DEFAULT_SESSION_TTL};

/// Runtime settings, read once from `WAYFARER_*` variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    pub api_key: String,
    pub database_url: Option<String>,
    pub allowed_origins: Vec<String>,
    pub generation: GenerationConfig,
    pub currency_api_url: Option<String>,
    pub currency_timeout: Duration,
    pub session_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            api_key: "dev-wayfarer-key".to_string(),
            database_url: None,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            generation: GenerationConfig::default(),
            currency_api_url: None,
            currency_timeout: Duration::from_secs(6),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let generation = GenerationConfig {
            tick: Duration::from_millis(
                parse_env(
                    "WAYFARER_GENERATION_TICK_MS",
                    defaults.generation.tick.as_millis() as u64,
                )
                .max(1),
            ),
            step: parse_env("WAYFARER_GENERATION_STEP", defaults.generation.step).max(1),
            seed: optional_env("WAYFARER_GENERATION_SEED").and_then(|value| value.parse().ok()),
        };

        Self {
            bind: optional_env("WAYFARER_BIND").unwrap_or(defaults.bind),
            api_key: optional_env("WAYFARER_API_KEY").unwrap_or(defaults.api_key),
            database_url: optional_env("WAYFARER_DATABASE_URL"),
            allowed_origins: optional_env("WAYFARER_ALLOWED_ORIGINS")
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.allowed_origins),
            generation,
            currency_api_url: optional_env("WAYFARER_CURRENCY_API_URL"),
            currency_timeout: Duration::from_secs(parse_env(
                "WAYFARER_CURRENCY_TIMEOUT_SECS",
                defaults.currency_timeout.as_secs(),
            )),
            session_ttl: Duration::from_secs(
                parse_env("WAYFARER_SESSION_TTL_SECS", defaults.session_ttl.as_secs()).max(1),
            ),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    optional_env(key)
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_tick_and_ttl_are_raised_to_the_minimum() {
        env::set_var("WAYFARER_GENERATION_TICK_MS", "0");
        env::set_var("WAYFARER_SESSION_TTL_SECS", "0");
        let config = ApiConfig::from_env();
        env::remove_var("WAYFARER_GENERATION_TICK_MS");
        env::remove_var("WAYFARER_SESSION_TTL_SECS");

        assert_eq!(config.generation.tick, Duration::from_millis(1));
        assert_eq!(config.session_ttl, Duration::from_secs(1));
    }
}
