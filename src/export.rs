use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fs;
use std::path::Path;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::cards::price::PriceEntry;

lazy_static! {
    static ref LEADING_DIGITS: Regex = Regex::new(r"^\d+").unwrap();
    static ref LETTERS: Regex = Regex::new(r"[a-zA-Z]+").unwrap();
}

/// Numeric prefix of a card number. Numbers without one ("TG01") sort after
/// every plainly numbered card.
pub fn numeric_part(number: &str) -> i64 {
    LEADING_DIGITS
        .find(number)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(i64::MAX)
}

/// Letter run of a card number, used as the secondary sort key.
pub fn alpha_part(number: &str) -> String {
    LETTERS
        .find(number)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Orders snapshot rows by set, then card number (numeric ascending,
/// lettered numbers last), then condition.
pub fn sort_price_entries(entries: &mut [PriceEntry]) {
    entries.sort_by(|a, b| {
        (
            a.set.as_str(),
            numeric_part(&a.number),
            alpha_part(&a.number),
            a.condition.as_str(),
        )
            .cmp(&(
                b.set.as_str(),
                numeric_part(&b.number),
                alpha_part(&b.number),
                b.condition.as_str(),
            ))
    });
}

/// Writes rows as CSV with serde-derived headers, creating parent
/// directories first.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the pivoted snapshot: one row per card, one column per condition,
/// market prices as values. Cells without a quote stay empty.
pub fn write_pivot_csv(path: &Path, entries: &[PriceEntry]) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let conditions: Vec<&str> = entries
        .iter()
        .map(|e| e.condition.as_str())
        .sorted()
        .dedup()
        .collect();

    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec!["set", "number", "name", "rarity"];
    header.extend(conditions.iter().copied());
    writer.write_record(&header)?;

    // entries arrive pre-sorted, so first appearance fixes the row order
    let mut row_keys: Vec<(&str, &str, &str, &str)> = Vec::new();
    let mut values: HashMap<(&str, &str, &str, &str), BTreeMap<&str, f64>> = HashMap::new();
    for entry in entries {
        let key = (
            entry.set.as_str(),
            entry.number.as_str(),
            entry.name.as_str(),
            entry.rarity.as_str(),
        );
        if !values.contains_key(&key) {
            row_keys.push(key);
        }
        values
            .entry(key)
            .or_default()
            .insert(entry.condition.as_str(), entry.price);
    }

    for key in row_keys {
        let prices = &values[&key];
        let mut record = vec![
            key.0.to_string(),
            key.1.to_string(),
            key.2.to_string(),
            key.3.to_string(),
        ];
        for condition in &conditions {
            record.push(
                prices
                    .get(condition)
                    .map(|price| price.to_string())
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
