use anyhow::{anyhow, Context, Result};

use crate::generation::review::BestTracking;

const DEFAULT_PROFILE_PATH: &str = "MasterProfile.json";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub profile_path: String,
    pub port: u16,
    pub rust_log: String,
    pub best_tracking: BestTracking,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            profile_path: std::env::var("PROFILE_PATH")
                .unwrap_or_else(|_| DEFAULT_PROFILE_PATH.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            best_tracking: best_tracking_from(std::env::var("BEST_TRACKING").ok().as_deref())?,
        })
    }
}

/// `BEST_TRACKING` is optional; unset or blank means the default policy.
fn best_tracking_from(value: Option<&str>) -> Result<BestTracking> {
    match value.map(str::trim) {
        None | Some("") => Ok(BestTracking::default()),
        Some(v) => v
            .parse()
            .map_err(|e: String| anyhow!(e))
            .context("BEST_TRACKING must be refresh_on_improvement or seed_once"),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
