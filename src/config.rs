use std::sync::OnceLock;
use std::time::Duration;

use dotenvy::dotenv;
use log::Level;

pub struct Config {
    log_level: Level,
    port: u16,
    request_timeout_secs: u64,
    request_delay_ms: u64,
    max_results: usize,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::init)
}

impl Config {
    fn init() -> Self {
        // Load environment variables from .env file if it exists
        _ = dotenv().inspect_err(|e| log::warn!("Unable to load the .env file: {e}"));

        let log_level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|level_str| level_str.to_uppercase().parse::<Level>().ok())
            .unwrap_or(Level::Info); // Default to INFO if parsing fails

        Config {
            log_level,
            port: env_parse("PORT").unwrap_or(5002),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS").unwrap_or(10),
            request_delay_ms: env_parse("REQUEST_DELAY_MS").unwrap_or(500),
            max_results: env_parse("MAX_RESULTS").unwrap_or(10),
        }
    }

    pub fn log_level(&self) -> Level {
        self.log_level
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|raw| raw.parse().ok())
}
