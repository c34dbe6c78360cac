use serde::Serialize;

use crate::cards::card::CardPrices;

/// One market quote for one card condition, as written to the set snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceEntry {
    pub id: String,
    pub name: String,
    pub set: String,
    pub number: String,
    pub rarity: String,
    pub condition: String,
    pub price: f64,
    pub updated_at: String,
    pub fetched_at: String,
}

/// One quote per price variant, as written by the single-card tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTypeEntry {
    pub id: String,
    pub name: String,
    pub set: String,
    pub number: String,
    pub rarity: String,
    pub condition: String,
    pub price_type: String,
    pub price: f64,
    pub updated_at: String,
    pub fetched_at: String,
}

/// Flattens the market price of every condition that quotes one. Conditions
/// with a null market value yield no row, whatever else they quote.
pub fn market_price_rows(card: &CardPrices, fetched_at: &str) -> Vec<PriceEntry> {
    card.prices
        .iter()
        .filter_map(|(condition, prices)| {
            prices.market.map(|price| PriceEntry {
                id: card.id.clone(),
                name: card.name.clone(),
                set: card.set.clone(),
                number: card.number.clone(),
                rarity: card.rarity.clone(),
                condition: condition.clone(),
                price,
                updated_at: card.updated_at.clone(),
                fetched_at: fetched_at.to_string(),
            })
        })
        .collect()
}

/// Flattens every non-null price variant of every condition.
pub fn all_price_rows(card: &CardPrices, fetched_at: &str) -> Vec<PriceTypeEntry> {
    let mut rows = Vec::new();
    for (condition, prices) in &card.prices {
        for (price_type, value) in prices.variants() {
            if let Some(price) = value {
                rows.push(PriceTypeEntry {
                    id: card.id.clone(),
                    name: card.name.clone(),
                    set: card.set.clone(),
                    number: card.number.clone(),
                    rarity: card.rarity.clone(),
                    condition: condition.clone(),
                    price_type: price_type.to_string(),
                    price,
                    updated_at: card.updated_at.clone(),
                    fetched_at: fetched_at.to_string(),
                });
            }
        }
    }
    rows
}
