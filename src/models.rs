//! Core data types that flow through one mirror run.

use std::fmt;

/// Name token of one proposal in the source repository, e.g. `CIP-0001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A binary file referenced by an item's document.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Link target exactly as it appears in the markdown.
    pub link: String,
    /// Path relative to the raw base URL.
    pub remote_path: String,
    /// File name under the item's asset directory.
    pub local_name: String,
    pub bytes: Vec<u8>,
}

/// An item after fetching, asset download and rendering.
#[derive(Debug, Clone)]
pub struct MirroredItem {
    pub id: ItemId,
    pub markdown: String,
    pub assets: Vec<Asset>,
}

/// Totals reported at the end of `pmirror sync`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Number of ids referenced by the index.
    pub items_found: usize,
    /// Ids selected for this run, in index order.
    pub items: Vec<ItemId>,
    pub items_written: usize,
    pub assets_written: usize,
    pub bytes_written: u64,
}
