use log::{error, info};
use serde::Deserialize;

use crate::cards::card::{ApiCard, CardPrices};
use crate::cards::set::SetDescriptor;
use crate::tcg_client::{FetchError, TcgApiClient};
use crate::utilities::constants::{MAX_SEARCH_PAGES, PAGE_SIZE};

/// Paged envelope every list endpoint responds with. `data` stays optional:
/// a response without the field is not the same as an empty page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedResponse<T> {
    data: Option<Vec<T>>,
    count: Option<u64>,
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CardEnvelope {
    data: Option<ApiCard>,
}

fn page_params(page: u64) -> Vec<(&'static str, String)> {
    vec![
        ("page", page.to_string()),
        ("pageSize", PAGE_SIZE.to_string()),
    ]
}

impl TcgApiClient {
    /// Collects the complete canonical set catalog across pages. A failed or
    /// data-less first page is an error; past page one the same condition
    /// means the catalog is exhausted.
    pub async fn get_all_sets(&self) -> Result<Vec<SetDescriptor>, FetchError> {
        let mut all_sets: Vec<SetDescriptor> = Vec::new();
        let mut page: u64 = 1;

        loop {
            let body = match self.get_json("sets", &page_params(page)).await {
                Ok(body) => body,
                Err(e) if page == 1 => {
                    error!("Could not retrieve the set catalog: {}", e);
                    return Err(e);
                }
                Err(_) => break,
            };
            let response: PagedResponse<SetDescriptor> = match serde_json::from_value(body) {
                Ok(response) => response,
                Err(e) if page == 1 => return Err(e.into()),
                Err(_) => break,
            };
            let sets = match response.data {
                Some(sets) => sets,
                None if page == 1 => return Err(FetchError::NoData),
                None => break,
            };
            if sets.is_empty() {
                break;
            }

            info!("Fetched page {} of the set catalog ({} sets)", page, sets.len());
            all_sets.extend(sets);

            if let (Some(count), Some(total)) = (response.count, response.total_count) {
                // count * page tells whether the last page has been consumed
                if count * page >= total {
                    break;
                }
            }
            page += 1;
        }

        info!("Retrieved {} sets in total", all_sets.len());
        Ok(all_sets)
    }

    /// Runs a card search across pages, bounded by the page ceiling so a
    /// misbehaving API cannot keep the loop alive forever.
    pub async fn search_cards(&self, query: &str) -> Result<Vec<ApiCard>, FetchError> {
        let mut all_cards: Vec<ApiCard> = Vec::new();
        let mut page: u64 = 1;

        while page <= MAX_SEARCH_PAGES {
            let mut params = vec![("q", query.to_string())];
            params.extend(page_params(page));

            let body = match self.get_json("cards", &params).await {
                Ok(body) => body,
                Err(e) if page == 1 => return Err(e),
                Err(_) => break,
            };
            let response: PagedResponse<ApiCard> = match serde_json::from_value(body) {
                Ok(response) => response,
                Err(e) if page == 1 => return Err(e.into()),
                Err(_) => break,
            };
            let cards = match response.data {
                Some(cards) => cards,
                None if page == 1 => return Err(FetchError::NoData),
                None => break,
            };
            if cards.is_empty() {
                break;
            }

            info!("Fetched page {} ({} cards)", page, cards.len());
            all_cards.extend(cards);

            // unlike the set catalog, the search loop compares what has
            // accumulated so far against the reported total
            if let (Some(_), Some(total)) = (response.count, response.total_count) {
                if all_cards.len() as u64 >= total {
                    break;
                }
            }
            page += 1;
        }

        Ok(all_cards)
    }

    /// Fetches a single card and converts it to a strict price record.
    /// Cards without a price listing resolve to None.
    pub async fn get_card_prices(&self, card_id: &str) -> Result<Option<CardPrices>, FetchError> {
        let body = self.get_json(&format!("cards/{}", card_id), &[]).await?;
        let envelope: CardEnvelope = serde_json::from_value(body)?;
        Ok(envelope.data.and_then(CardPrices::from_api))
    }
}
