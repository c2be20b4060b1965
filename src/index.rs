//! Item identifier extraction from the index document.

use regex::Regex;
use std::collections::HashSet;

use crate::models::ItemId;

/// Collect item identifiers from `index_text`.
///
/// Uses capture group 1 when `pattern` has one, otherwise the whole match
/// minus a single trailing `/`. Order is first occurrence; duplicates and
/// empty captures are dropped.
pub fn extract_item_ids(index_text: &str, pattern: &Regex) -> Vec<ItemId> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for caps in pattern.captures_iter(index_text) {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let raw = match caps.get(1) {
            Some(group) => group.as_str(),
            None => whole.strip_suffix('/').unwrap_or(whole),
        };
        if raw.is_empty() {
            continue;
        }
        if seen.insert(raw.to_string()) {
            ids.push(ItemId::new(raw));
        }
    }

    ids
}
