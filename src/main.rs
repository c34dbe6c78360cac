// main.rs
mod card_tracker;
mod cards;
mod catalog;
mod export;
mod set_resolver;
mod set_tracker;
mod tcg_client;
#[cfg(test)]
mod test;
mod utilities;

use std::time::Duration;

use dotenv::dotenv;
use log::{error, info};

use card_tracker::CardTracker;
use set_tracker::SetTracker;
use tcg_client::{RetryPolicy, TcgApiClient};
use utilities::config::CONFIG;

fn build_client() -> Result<TcgApiClient, Box<dyn std::error::Error>> {
    let pacing = Duration::from_secs_f64(CONFIG.rate_limit_delay);
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(CONFIG.request_timeout))
        .build()?;

    Ok(TcgApiClient::new(None, http, CONFIG.api_key.clone())
        .with_rate_limit_delay(pacing)
        .with_retry(RetryPolicy {
            max_retries: CONFIG.max_retries,
            backoff_factor: CONFIG.backoff_factor,
            base_delay: pacing,
        }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();
    info!("Starting");

    if CONFIG.sets.is_empty() && CONFIG.card_query.is_empty() {
        error!("Nothing to do: set SETS to a comma-separated list of set names, or CARD_QUERY to a card search query");
        return Ok(());
    }

    if !CONFIG.sets.is_empty() {
        let tracker = SetTracker::new(build_client()?, &CONFIG.data_folder);
        tracker
            .track_sets_to_csv(&CONFIG.sets, &CONFIG.output_prefix)
            .await?;
    }

    if !CONFIG.card_query.is_empty() {
        let tracker = CardTracker::new(build_client()?, &CONFIG.data_folder);
        tracker
            .track_cards(&CONFIG.card_query, &CONFIG.output_prefix)
            .await?;
    }

    Ok(())
}
