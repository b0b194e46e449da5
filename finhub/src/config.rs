use serde::Deserialize;
use std::collections::HashMap;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

pub const DEFAULT_CURRENCY_RATES: &str = "EUR:1.08,GBP:1.27,INR:0.012";

/// Parse a `CURRENCY_RATES` value.
/// Format: comma-separated `CODE:rate` pairs, e.g. `EUR:1.08,GBP:1.27`
pub fn parse_currency_rates(raw: &str) -> HashMap<String, f64> {
    raw.split(',')
        .filter(|pair| !pair.trim().is_empty())
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, ':');
            let code = parts.next()?.trim().to_uppercase();
            let rate = parts.next()?.trim();
            match rate.parse::<f64>() {
                Ok(rate) if code.len() == 3 && rate.is_finite() && rate > 0.0 => {
                    Some((code, rate))
                }
                _ => {
                    tracing::warn!("Invalid currency rate pair '{}' in CURRENCY_RATES, skipping", pair);
                    None
                }
            }
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: Option<LlmConfig>,
    pub currency: CurrencyConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for inbound webhook bodies, in bytes.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
    pub busy_timeout_ms: u64,
    pub journal_mode: String,
    pub synchronous: String,
}

impl DatabaseConfig {
    /// Local file database with default pragmas.
    pub fn local(path: impl AsRef<std::path::Path>) -> Self {
        Self {
            url: format!("file:{}", path.as_ref().display()),
            auth_token: None,
            local_path: None,
            busy_timeout_ms: 5000,
            journal_mode: "WAL".to_string(),
            synchronous: "NORMAL".to_string(),
        }
    }
}

/// LLM configuration for the extraction model
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    /// Canonical currency every amount is displayed in.
    pub display: String,
    /// Multipliers from a source currency into the display currency.
    pub rates: HashMap<String, f64>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            display: "USD".to_string(),
            rates: parse_currency_rates(DEFAULT_CURRENCY_RATES),
        }
    }
}

impl CurrencyConfig {
    fn from_env() -> Self {
        let display = env::var("DISPLAY_CURRENCY")
            .map(|c| c.trim().to_uppercase())
            .ok()
            .filter(|c| c.len() == 3)
            .unwrap_or_else(|| "USD".to_string());
        let rates = match env::var("CURRENCY_RATES") {
            Ok(raw) => parse_currency_rates(&raw),
            Err(_) => {
                if display != "USD" {
                    let display_currency = &display;
                    tracing::warn!(
                        display = %display_currency,
                        "DISPLAY_CURRENCY set without CURRENCY_RATES; default rates are USD-relative"
                    );
                }
                parse_currency_rates(DEFAULT_CURRENCY_RATES)
            }
        };
        Self { display, rates }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Budget for a single extraction oracle call.
    pub oracle_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("FINHUB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("FINHUB_PORT", 3000),
                max_body_bytes: parse_env_or("FINHUB_MAX_BODY_BYTES", 10 * 1024 * 1024),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:finhub.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
                busy_timeout_ms: parse_env_or("DATABASE_BUSY_TIMEOUT_MS", 5000),
                journal_mode: env::var("DATABASE_JOURNAL_MODE")
                    .unwrap_or_else(|_| "WAL".to_string()),
                synchronous: env::var("DATABASE_SYNCHRONOUS")
                    .unwrap_or_else(|_| "NORMAL".to_string()),
            },
            llm: env::var("LLM_MODEL").ok().map(|model| LlmConfig {
                model,
                api_key: env::var("LLM_API_KEY").ok(),
                base_url: env::var("LLM_BASE_URL").ok(),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
                max_retries: parse_env_or("LLM_MAX_RETRIES", 3),
                temperature: parse_env_opt("LLM_TEMPERATURE"),
            }),
            currency: CurrencyConfig::from_env(),
            ingest: IngestConfig {
                oracle_timeout_secs: parse_env_or("ORACLE_TIMEOUT_SECS", 45),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}
