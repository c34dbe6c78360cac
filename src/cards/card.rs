use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;
use serde_json::Value;

/// Card as returned by the `/cards` endpoints, trimmed to the fields the
/// tracker reads. Everything the provider may omit is optional here.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCard {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub set: Option<SetRef>,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub tcgplayer: Option<TcgplayerListing>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcgplayerListing {
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub prices: BTreeMap<String, Value>,
}

/// Price variants quoted for one card condition. Any of them can be null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionPrices {
    pub low: Option<f64>,
    pub mid: Option<f64>,
    pub high: Option<f64>,
    pub market: Option<f64>,
    pub direct_low: Option<f64>,
}

impl ConditionPrices {
    pub fn variants(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("low", self.low),
            ("mid", self.mid),
            ("high", self.high),
            ("market", self.market),
            ("directLow", self.direct_low),
        ]
    }
}

/// A card together with its quoted prices, converted to strict fields.
#[derive(Debug, Clone)]
pub struct CardPrices {
    pub id: String,
    pub name: String,
    pub set: String,
    pub number: String,
    pub rarity: String,
    pub updated_at: String,
    pub prices: BTreeMap<String, ConditionPrices>,
}

impl CardPrices {
    /// Returns None when the card carries no tcgplayer listing at all.
    /// Condition entries that are not price objects are dropped.
    pub fn from_api(card: ApiCard) -> Option<Self> {
        let listing = card.tcgplayer?;

        let mut prices = BTreeMap::new();
        for (condition, block) in listing.prices {
            match serde_json::from_value::<ConditionPrices>(block) {
                Ok(parsed) => {
                    prices.insert(condition, parsed);
                }
                Err(e) => {
                    debug!(
                        "Skipping malformed '{}' price block on {}: {}",
                        condition, card.id, e
                    );
                }
            }
        }

        Some(CardPrices {
            id: card.id,
            name: card.name,
            set: card.set.map(|s| s.name).unwrap_or_default(),
            number: card.number,
            rarity: card.rarity.unwrap_or_default(),
            updated_at: listing.updated_at,
            prices,
        })
    }
}
