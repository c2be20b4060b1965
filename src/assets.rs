//! Asset link discovery and rewriting.
//!
//! An asset is a relative markdown link target (`](diagram.png)`) whose
//! extension is in `assets.extensions`. Absolute URLs are left alone, and
//! so are targets that climb out of the item directory with `..`.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};

use crate::models::ItemId;

/// Relative link targets in `text` that end in one of `extensions`.
///
/// First-seen order, no duplicates.
pub fn find_asset_links(text: &str, extensions: &[String]) -> Vec<String> {
    let alternation = extensions
        .iter()
        .map(|e| regex::escape(e))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"\]\(([^()\s]+\.(?:{}))\)", alternation);
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|link| !link.contains("http://") && !link.contains("https://"))
        .filter(|link| item_relative(link).is_some())
        .filter(|link| seen.insert(link.to_string()))
        .map(str::to_string)
        .collect()
}

/// `link` as a path inside the item directory.
///
/// Leading `/`, empty and `.` segments are dropped. `None` when a `..`
/// segment would leave the item directory or nothing is left.
pub fn item_relative(link: &str) -> Option<String> {
    let mut parts = Vec::new();
    for part in link.split('/') {
        match part {
            "" | "." => continue,
            ".." => return None,
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Name the asset is stored under: item-relative path, extension renamed.
///
/// Empty for links [`item_relative`] rejects.
pub fn local_name(link: &str, rename: &BTreeMap<String, String>) -> String {
    let name = item_relative(link).unwrap_or_default();
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => match rename.get(ext) {
            Some(new_ext) => format!("{}.{}", stem, new_ext),
            None => name,
        },
        _ => name,
    }
}

/// Asset location relative to the raw base URL.
pub fn remote_path(item: &ItemId, link: &str) -> String {
    match item_relative(link) {
        Some(relative) => format!("{}/{}", item, relative),
        None => item.to_string(),
    }
}

/// Link target written into the mirrored page.
pub fn static_link(prefix: &str, item: &ItemId, local_name: &str) -> String {
    format!("{}/{}/{}", prefix.trim_end_matches('/'), item, local_name)
}

/// Replace every `](link)` with `](target)`.
pub fn rewrite_asset_link(text: &str, link: &str, target: &str) -> String {
    text.replace(&format!("]({})", link), &format!("]({})", target))
}
