use std::time::Duration;

use serde_json::{json, Value};

use crate::tcg_client::{RetryPolicy, TcgApiClient};

/// Client pointed at a mock server, with pacing and backoff collapsed to
/// zero so tests never sleep.
pub fn test_client(base_url: &str) -> TcgApiClient {
    TcgApiClient::new(Some(base_url), reqwest::Client::new(), None)
        .with_rate_limit_delay(Duration::ZERO)
        .with_retry(RetryPolicy {
            max_retries: 3,
            backoff_factor: 2.0,
            base_delay: Duration::ZERO,
        })
}

/// A catalog listing as seen in practice, promo subset spelling included.
pub fn canonical_set_names() -> Vec<String> {
    [
        "Base",
        "Jungle",
        "Fossil",
        "Base Set 2",
        "Team Rocket",
        "Gym Heroes",
        "Base—Black Star Promos",
        "Neo Genesis",
        "151",
        "Scarlet & Violet",
        "Crown Zenith",
        "Crown Zenith Galarian Gallery",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn card_json(id: &str, name: &str, set: &str, number: &str, rarity: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "set": {"id": "base2", "name": set, "series": "Base"},
        "number": number,
        "rarity": rarity,
        "tcgplayer": {
            "url": format!("https://prices.pokemontcg.io/tcgplayer/{}", id),
            "updatedAt": "2024/03/05",
            "prices": {
                "holofoil": {
                    "low": 20.0,
                    "mid": 24.0,
                    "high": 30.0,
                    "market": 25.5,
                    "directLow": null
                }
            }
        }
    })
}

pub fn sets_page(start: u64, count: u64, total: u64) -> Value {
    let data: Vec<Value> = (start..start + count)
        .map(|i| json!({"id": format!("set{}", i), "name": format!("Set {}", i), "series": "Test"}))
        .collect();
    json!({"data": data, "count": count, "totalCount": total})
}
