//! Configuration loader: merges env vars, .env file, and config.toml.

use common::config::{BotConfig, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS};
use common::{Credentials, Error};
use std::path::Path;

fn parse_positive_usize(raw: &str, env_name: &str) -> Result<usize, Error> {
    let parsed = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_timeout(raw: &str) -> Result<u64, Error> {
    raw.trim().parse::<u64>().map_err(|_| {
        Error::Config("OZON_REQUEST_TIMEOUT_SECS must be an integer number of seconds".into())
    })
}

fn validate_config(config: &BotConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.base_url.trim().is_empty() {
        issues.push("base_url must not be empty".into());
    }
    if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&config.request_timeout_secs) {
        issues.push(format!(
            "request_timeout_secs must be within {}..={}",
            MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS
        ));
    }
    if config.page_size == 0 {
        issues.push("page_size must be > 0".into());
    }
    if config.max_pages == 0 {
        issues.push("max_pages must be > 0".into());
    }
    if config.requests_per_second == 0 {
        issues.push("requests_per_second must be > 0".into());
    }
    if config.review_fetch_limit == 0 {
        issues.push("review_fetch_limit must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Apply environment overrides on top of file/default values.
fn apply_env_overrides(
    config: &mut BotConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<(), Error> {
    if let Some(id) = var("OZON_CLIENT_ID") {
        config.client_id = id;
    }
    if let Some(key) = var("OZON_API_KEY") {
        config.api_key = key;
    }
    if let Some(url) = var("OZON_API_BASE_URL") {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            tracing::warn!("Ignoring empty OZON_API_BASE_URL override");
        } else {
            config.base_url = trimmed.to_string();
        }
    }
    if let Some(raw) = var("OZON_REQUEST_TIMEOUT_SECS") {
        config.request_timeout_secs = parse_timeout(&raw)?;
    }
    if let Some(raw) = var("OZON_PAGE_SIZE") {
        config.page_size = parse_positive_usize(&raw, "OZON_PAGE_SIZE")?;
    }
    if let Some(raw) = var("OZON_MAX_PAGES") {
        config.max_pages = parse_positive_usize(&raw, "OZON_MAX_PAGES")?;
    }
    Ok(())
}

/// Load configuration from environment and optional config file, and
/// return it with the validated credentials.
pub fn load_config() -> Result<(BotConfig, Credentials), Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = BotConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    // 5. Credentials are required; everything else must be in range.
    let credentials = Credentials::new(config.client_id.clone(), config.api_key.clone())?;
    validate_config(&config)?;

    Ok((config, credentials))
}
