use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TERM_SPLITTER: Regex = Regex::new(r"[-—_&\s]+").unwrap();
}

const PROMO_MARKER: &str = "Black Star Promos";

/// Finds the canonical spelling of a user-typed set name.
///
/// Matching runs in strict priority order: exact, case-insensitive exact,
/// promo-subset prefix, substring containment, shared-term count. The first
/// tier that produces anything wins, and within a tier the first candidate
/// in catalog order wins. Returns None when no canonical name shares a
/// single term with the target.
pub fn find_closest_set_name<'a>(
    target_name: &str,
    available_sets: &'a [String],
) -> Option<&'a str> {
    if let Some(exact) = available_sets.iter().find(|s| s.as_str() == target_name) {
        return Some(exact);
    }

    let target_lower = target_name.to_lowercase();
    if let Some(folded) = available_sets
        .iter()
        .find(|s| s.to_lowercase() == target_lower)
    {
        return Some(folded);
    }

    // The catalog separates promo subsets with inconsistent dashes
    // ("Base—Black Star Promos", "Base - Black Star Promos"), so match on
    // the part in front of the marker instead.
    if target_name.contains(PROMO_MARKER) {
        let prefix = target_name
            .split("Black Star")
            .next()
            .unwrap_or_default()
            .trim();
        if let Some(promo) = available_sets
            .iter()
            .find(|s| s.contains(prefix) && s.contains(PROMO_MARKER))
        {
            return Some(promo);
        }
    }

    if let Some(containing) = available_sets
        .iter()
        .find(|s| s.to_lowercase().contains(&target_lower))
    {
        return Some(containing);
    }

    let target_terms = split_terms(&target_lower);
    let mut best_match: Option<&'a String> = None;
    let mut most_terms_matched = 0;
    for set_name in available_sets {
        let set_lower = set_name.to_lowercase();
        let set_terms = split_terms(&set_lower);
        let matched_terms = target_terms
            .iter()
            .filter(|term| set_terms.contains(term))
            .count();

        // a strict comparison keeps the first candidate on ties
        if matched_terms > most_terms_matched {
            most_terms_matched = matched_terms;
            best_match = Some(set_name);
        }
    }

    best_match.map(String::as_str)
}

fn split_terms(name: &str) -> Vec<&str> {
    TERM_SPLITTER
        .split(name)
        .filter(|term| !term.is_empty())
        .collect()
}
