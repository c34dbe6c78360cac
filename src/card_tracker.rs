use std::error::Error;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::cards::card::CardPrices;
use crate::cards::price::{all_price_rows, PriceTypeEntry};
use crate::export::write_csv;
use crate::tcg_client::TcgApiClient;
use crate::utilities::file_management::save_to_json_file;
use crate::utilities::string_manipulators::{
    date_time_as_string, fetched_at_timestamp, file_name_fragment,
};

pub struct CardTracker {
    client: TcgApiClient,
    data_folder: PathBuf,
}

impl CardTracker {
    pub fn new(client: TcgApiClient, data_folder: &str) -> Self {
        CardTracker {
            client,
            data_folder: Path::new(data_folder).to_path_buf(),
        }
    }

    /// Fetches every card matching the query, writes one CSV per card with
    /// every price variant, and a consolidated JSON + CSV for the whole run.
    pub async fn track_cards(&self, query: &str, output_name: &str) -> Result<(), Box<dyn Error>> {
        let cards = self.client.search_cards(query).await?;
        if cards.is_empty() {
            warn!("No cards found matching the query '{}'", query);
            return Ok(());
        }

        let mut all_rows: Vec<PriceTypeEntry> = Vec::new();
        for (i, card) in cards.iter().enumerate() {
            info!(
                "Processing card {}/{}: {} ({})",
                i + 1,
                cards.len(),
                card.name,
                card.id
            );
            let prices = match self.client.get_card_prices(&card.id).await {
                Ok(Some(prices)) => prices,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Could not fetch prices for {}: {}", card.id, e);
                    continue;
                }
            };

            let rows = all_price_rows(&prices, &fetched_at_timestamp(None));
            if rows.is_empty() {
                info!("No quoted prices on {}", card.id);
                continue;
            }
            self.save_card_rows(&prices, &rows)?;
            all_rows.extend(rows);
        }

        if all_rows.is_empty() {
            warn!("No price data found for the query '{}'", query);
            return Ok(());
        }

        let timestamp = date_time_as_string(None, None);
        let json_path = self
            .data_folder
            .join(format!("{}_{}.json", output_name, timestamp));
        save_to_json_file(&json_path, &all_rows)?;
        info!("Consolidated data saved to {}", json_path.display());

        let csv_path = self
            .data_folder
            .join(format!("{}_{}.csv", output_name, timestamp));
        write_csv(&csv_path, &all_rows)?;
        info!("Consolidated CSV saved to {}", csv_path.display());

        Ok(())
    }

    fn save_card_rows(
        &self,
        card: &CardPrices,
        rows: &[PriceTypeEntry],
    ) -> Result<(), Box<dyn Error>> {
        let file_name = format!(
            "{}_{}_{}.csv",
            file_name_fragment(&card.name),
            file_name_fragment(&card.set),
            date_time_as_string(None, Some("%Y%m%d"))
        );
        let path = self.data_folder.join(file_name);
        write_csv(&path, rows)?;
        info!("Price data saved to {}", path.display());
        Ok(())
    }
}
