use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::cards::price::{market_price_rows, PriceEntry};
use crate::export::{sort_price_entries, write_csv, write_pivot_csv};
use crate::set_resolver::find_closest_set_name;
use crate::tcg_client::TcgApiClient;
use crate::utilities::constants::{ALL_SETS_FILE, NOT_FOUND_MARKER};
use crate::utilities::file_management::save_to_json_file;
use crate::utilities::string_manipulators::{date_time_as_string, fetched_at_timestamp};

pub struct SetTracker {
    client: TcgApiClient,
    data_folder: PathBuf,
}

impl SetTracker {
    pub fn new(client: TcgApiClient, data_folder: &str) -> Self {
        SetTracker {
            client,
            data_folder: Path::new(data_folder).to_path_buf(),
        }
    }

    /// Tracks every card of the given sets into one combined snapshot:
    /// dumps the set catalog, resolves and persists the name mapping, then
    /// fetches and flattens market prices per card. Returns the snapshot CSV
    /// path, or None when no priced card was found in any set.
    pub async fn track_sets_to_csv(
        &self,
        set_names: &[String],
        output_prefix: &str,
    ) -> Result<Option<PathBuf>, Box<dyn Error>> {
        let start_time = chrono::prelude::Local::now();
        let all_sets = self.client.get_all_sets().await?;
        if all_sets.is_empty() {
            return Err("The set catalog came back empty".into());
        }

        let sets_path = self.data_folder.join(ALL_SETS_FILE);
        save_to_json_file(&sets_path, &all_sets)?;
        info!("Saved the complete set catalog to {}", sets_path.display());

        let available_names: Vec<String> = all_sets.iter().map(|s| s.name.clone()).collect();

        let mut mapping: BTreeMap<String, String> = BTreeMap::new();
        let mut matched_sets: Vec<String> = Vec::new();
        for set_name in set_names {
            match find_closest_set_name(set_name, &available_names) {
                Some(matched) => {
                    info!("Matched '{}' to catalog set name '{}'", set_name, matched);
                    mapping.insert(set_name.clone(), matched.to_string());
                    matched_sets.push(matched.to_string());
                }
                None => {
                    warn!("No matching set found for '{}', skipping it", set_name);
                    mapping.insert(set_name.clone(), NOT_FOUND_MARKER.to_string());
                }
            }
        }

        let mapping_path = self
            .data_folder
            .join(format!("{}_set_mapping.json", output_prefix));
        save_to_json_file(&mapping_path, &mapping)?;
        info!("Saved the set name mapping to {}", mapping_path.display());

        let mut all_rows: Vec<PriceEntry> = Vec::new();
        for matched in &matched_sets {
            let query = format!("set.name:\"{}\"", matched);
            let cards = match self.client.search_cards(&query).await {
                Ok(cards) => cards,
                Err(e) => {
                    error!("Card search for '{}' failed: {}", matched, e);
                    continue;
                }
            };
            if cards.is_empty() {
                warn!("No cards found in the {} set", matched);
                continue;
            }
            info!("Found {} cards in the {} set", cards.len(), matched);

            for (i, card) in cards.iter().enumerate() {
                info!(
                    "Processing card {}/{}: {} ({})",
                    i + 1,
                    cards.len(),
                    card.name,
                    card.id
                );
                match self.client.get_card_prices(&card.id).await {
                    Ok(Some(prices)) => {
                        all_rows.extend(market_price_rows(&prices, &fetched_at_timestamp(None)));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Could not fetch prices for {}: {}", card.id, e);
                    }
                }
            }
        }

        if all_rows.is_empty() {
            warn!("No price data found for any card in the requested sets");
            return Ok(None);
        }

        sort_price_entries(&mut all_rows);

        let timestamp = date_time_as_string(None, None);
        let csv_path = self
            .data_folder
            .join(format!("{}_{}.csv", output_prefix, timestamp));
        write_csv(&csv_path, &all_rows)?;

        let pivot_path = self
            .data_folder
            .join(format!("{}_pivot_{}.csv", output_prefix, timestamp));
        write_pivot_csv(&pivot_path, &all_rows)?;

        let end_time = chrono::prelude::Local::now();
        info!(
            "Tracked {} sets into {} price rows in {} seconds. Snapshot: {}. Pivot: {}",
            set_names.len(),
            all_rows.len(),
            (end_time - start_time).num_seconds(),
            csv_path.display(),
            pivot_path.display()
        );

        Ok(Some(csv_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::helpers::{card_json, test_client};
    use mockito::Matcher;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    use crate::utilities::file_management::load_from_json_file;

    #[tokio::test]
    async fn test_tracks_a_resolved_set_end_to_end() {
        let mut server = std::thread::spawn(|| mockito::Server::new())
            .join()
            .unwrap();

        let sets_mock = server
            .mock("GET", "/sets")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(
                json!({
                    "data": [
                        {"id": "base2", "name": "Jungle", "series": "Base"},
                        {"id": "basep", "name": "Base—Black Star Promos", "series": "Base"}
                    ],
                    "count": 2,
                    "totalCount": 2
                })
                .to_string(),
            )
            .expect(1)
            .create();

        let search_mock = server
            .mock("GET", "/cards")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "set.name:\"Jungle\"".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "data": [card_json("base2-1", "Clefable", "Jungle", "1", "Rare Holo")],
                    "count": 1,
                    "totalCount": 1
                })
                .to_string(),
            )
            .expect(1)
            .create();

        let card_mock = server
            .mock("GET", "/cards/base2-1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": card_json("base2-1", "Clefable", "Jungle", "1", "Rare Holo")})
                    .to_string(),
            )
            .expect(1)
            .create();

        let dir = tempdir().unwrap();
        let tracker = SetTracker::new(
            test_client(&server.url()),
            dir.path().to_str().unwrap(),
        );

        let set_names = vec!["jungle".to_string(), "No Such Set XYZQ".to_string()];
        let csv_path = tracker
            .track_sets_to_csv(&set_names, "tracked")
            .await
            .unwrap()
            .expect("a snapshot should have been written");

        sets_mock.assert();
        search_mock.assert();
        card_mock.assert();

        // catalog dump keeps the provider fields
        let catalog: Vec<Value> =
            load_from_json_file(&dir.path().join(ALL_SETS_FILE)).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0]["series"], "Base");

        let mapping: BTreeMap<String, String> =
            load_from_json_file(&dir.path().join("tracked_set_mapping.json")).unwrap();
        assert_eq!(mapping["jungle"], "Jungle");
        assert_eq!(mapping["No Such Set XYZQ"], "Not found");

        let snapshot = fs::read_to_string(&csv_path).unwrap();
        assert!(snapshot.starts_with("id,name,set,number,rarity,condition,price,updated_at,fetched_at"));
        assert!(snapshot.contains("base2-1,Clefable,Jungle,1,Rare Holo,holofoil,25.5"));

        let pivot_path = csv_path
            .to_str()
            .unwrap()
            .replace("tracked_", "tracked_pivot_");
        let pivot = fs::read_to_string(&pivot_path).unwrap();
        assert!(pivot.starts_with("set,number,name,rarity,"));
        assert!(pivot.contains("Jungle,1,Clefable,Rare Holo"));
    }

    #[tokio::test]
    async fn test_a_failed_catalog_fetch_aborts_the_run() {
        let mut server = std::thread::spawn(|| mockito::Server::new())
            .join()
            .unwrap();
        let sets_mock = server
            .mock("GET", "/sets")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .expect(1)
            .create();

        let dir = tempdir().unwrap();
        let tracker = SetTracker::new(
            test_client(&server.url()),
            dir.path().to_str().unwrap(),
        );

        let result = tracker
            .track_sets_to_csv(&["Jungle".to_string()], "tracked")
            .await;

        sets_mock.assert();
        assert!(result.is_err());
        // nothing may be written when the catalog is unavailable
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_a_run_without_priced_cards_still_writes_the_mapping() {
        let mut server = std::thread::spawn(|| mockito::Server::new())
            .join()
            .unwrap();
        let sets_mock = server
            .mock("GET", "/sets")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": [{"name": "Jungle"}], "count": 1, "totalCount": 1}).to_string(),
            )
            .expect(1)
            .create();
        // the search finds nothing for the resolved set
        let search_mock = server
            .mock("GET", "/cards")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": [], "count": 0, "totalCount": 0}).to_string())
            .expect(1)
            .create();

        let dir = tempdir().unwrap();
        let tracker = SetTracker::new(
            test_client(&server.url()),
            dir.path().to_str().unwrap(),
        );

        let result = tracker
            .track_sets_to_csv(&["Jungle".to_string()], "tracked")
            .await
            .unwrap();

        sets_mock.assert();
        search_mock.assert();
        assert!(result.is_none());

        let mapping: BTreeMap<String, String> =
            load_from_json_file(&dir.path().join("tracked_set_mapping.json")).unwrap();
        assert_eq!(mapping["Jungle"], "Jungle");
    }
}
