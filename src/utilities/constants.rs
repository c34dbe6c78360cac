pub const TCG_API_URL: &str = "https://api.pokemontcg.io/v2";

pub const DATA_FOLDER: &str = "pokemon_tcg_data";
pub const ALL_SETS_FILE: &str = "all_set_data.json";
pub const DEFAULT_OUTPUT_PREFIX: &str = "combined_sets";

pub const NOT_FOUND_MARKER: &str = "Not found";

pub const PAGE_SIZE: u64 = 250;
pub const MAX_SEARCH_PAGES: u64 = 10;

pub const DEFAULT_RATE_LIMIT_DELAY_SECS: f64 = 1.0;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
