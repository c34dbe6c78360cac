use std::env;

use crate::utilities::constants::{
    DATA_FOLDER, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_PREFIX,
    DEFAULT_RATE_LIMIT_DELAY_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub rate_limit_delay: f64,
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub request_timeout: u64,
    pub data_folder: String,
    pub sets: Vec<String>,
    pub output_prefix: String,
    pub card_query: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            rate_limit_delay: DEFAULT_RATE_LIMIT_DELAY_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            data_folder: DATA_FOLDER.to_string(),
            sets: Vec::new(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            card_query: "".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.update_from_env();
        config
    }

    fn update_from_env(&mut self) {
        if let Ok(api_key) = env::var("API_KEY") {
            if !api_key.is_empty() {
                self.api_key = Some(api_key);
            }
        }
        if let Ok(delay) = env::var("RATE_LIMIT_DELAY") {
            self.rate_limit_delay = delay.parse().unwrap_or(DEFAULT_RATE_LIMIT_DELAY_SECS);
        }
        if let Ok(max_retries) = env::var("MAX_RETRIES") {
            self.max_retries = max_retries.parse().unwrap_or(DEFAULT_MAX_RETRIES);
        }
        if let Ok(backoff_factor) = env::var("BACKOFF_FACTOR") {
            self.backoff_factor = backoff_factor.parse().unwrap_or(DEFAULT_BACKOFF_FACTOR);
        }
        if let Ok(request_timeout) = env::var("REQUEST_TIMEOUT") {
            self.request_timeout = request_timeout.parse().unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        }
        if let Ok(data_folder) = env::var("DATA_FOLDER") {
            if !data_folder.is_empty() {
                self.data_folder = data_folder;
            }
        }
        if let Ok(sets) = env::var("SETS") {
            self.sets = sets
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(output_prefix) = env::var("OUTPUT_PREFIX") {
            if !output_prefix.is_empty() {
                self.output_prefix = output_prefix;
            }
        }
        if let Ok(card_query) = env::var("CARD_QUERY") {
            self.card_query = card_query;
        }
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: Config = Config::new();
}
