//! Mirror pipeline orchestration.
//!
//! index → item ids → (document + assets) per item → render → write.
//! At most `http.concurrency` requests are in flight at once, counting
//! document and asset fetches together. The first failure aborts the run;
//! nothing is retried.

use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::sync::Semaphore;

use crate::assets::{find_asset_links, local_name, remote_path, rewrite_asset_link, static_link};
use crate::config::Config;
use crate::index::extract_item_ids;
use crate::models::{Asset, ItemId, MirroredItem, SyncSummary};
use crate::output;
use crate::progress::{SyncProgressEvent, SyncProgressReporter};
use crate::source::{DocumentSource, HttpSource};
use crate::transform::render_document;

/// Flags of `pmirror sync`.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Read the index and report what would be mirrored; touch nothing.
    pub dry_run: bool,
    /// Mirror only these items. The docs directory is not cleared.
    pub items: Vec<String>,
    /// Mirror at most this many items. The docs directory is not cleared.
    pub limit: Option<usize>,
}

impl SyncOptions {
    fn is_full(&self) -> bool {
        self.items.is_empty() && self.limit.is_none()
    }
}

/// `pmirror sync`: mirror over HTTP and print a summary on stdout.
pub async fn run_sync(
    config: &Config,
    options: &SyncOptions,
    reporter: &dyn SyncProgressReporter,
) -> Result<()> {
    let source = HttpSource::from_config(config)?;
    let summary = mirror(config, &source, options, reporter).await?;

    if options.dry_run {
        println!("sync {} (dry-run)", config.source.repo_name);
        println!("  items found: {}", summary.items_found);
        println!("  items selected: {}", summary.items.len());
        for item in &summary.items {
            println!("  {}", item);
        }
        return Ok(());
    }

    println!("sync {}", config.source.repo_name);
    println!("  items found: {}", summary.items_found);
    println!("  items written: {}", summary.items_written);
    println!("  assets written: {}", summary.assets_written);
    println!("  bytes written: {}", summary.bytes_written);
    println!("ok");
    Ok(())
}

/// `pmirror list`: print the item ids the index references, one per line.
pub async fn run_list(config: &Config) -> Result<()> {
    let source = HttpSource::from_config(config)?;
    for item in fetch_index(config, &source).await? {
        println!("{}", item);
    }
    Ok(())
}

/// Fetch the index document and extract item ids from it.
pub async fn fetch_index(config: &Config, source: &dyn DocumentSource) -> Result<Vec<ItemId>> {
    let index_path = &config.source.index_path;
    let index_text = source
        .fetch_text(index_path)
        .await
        .with_context(|| format!("Failed to fetch index {}", source.describe(index_path)))?;
    let ids = extract_item_ids(&index_text, &config.item_regex()?);
    tracing::info!(count = ids.len(), "index parsed");
    Ok(ids)
}

/// Run the whole pipeline against `source`.
pub async fn mirror(
    config: &Config,
    source: &dyn DocumentSource,
    options: &SyncOptions,
    reporter: &dyn SyncProgressReporter,
) -> Result<SyncSummary> {
    reporter.report(SyncProgressEvent::Discovering {
        repo: config.source.repo_name.clone(),
    });

    let found = fetch_index(config, source).await?;
    let items = select_items(&found, options)?;

    let mut summary = SyncSummary {
        items_found: found.len(),
        items: items.clone(),
        ..SyncSummary::default()
    };

    if options.dry_run {
        return Ok(summary);
    }

    if options.is_full() {
        output::reset_dir(&config.output.docs_dir)?;
    }

    let total = items.len() as u64;
    let permits = Semaphore::new(config.http.concurrency);
    let mut fetched = stream::iter(items)
        .map(|item| fetch_item(config, source, &permits, item))
        .buffer_unordered(config.http.concurrency);

    while let Some(mirrored) = fetched.try_next().await? {
        let (assets, bytes) = write_item(config, &mirrored, reporter)?;
        summary.items_written += 1;
        summary.assets_written += assets;
        summary.bytes_written += bytes;
        reporter.report(SyncProgressEvent::Item {
            item: mirrored.id.to_string(),
            n: summary.items_written as u64,
            total,
        });
    }

    Ok(summary)
}

fn select_items(found: &[ItemId], options: &SyncOptions) -> Result<Vec<ItemId>> {
    let mut items: Vec<ItemId> = if options.items.is_empty() {
        found.to_vec()
    } else {
        let missing: Vec<&str> = options
            .items
            .iter()
            .filter(|wanted| !found.iter().any(|id| id.as_str() == wanted.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            bail!("Not referenced by the index: {}", missing.join(", "));
        }
        found
            .iter()
            .filter(|id| options.items.iter().any(|wanted| wanted == id.as_str()))
            .cloned()
            .collect()
    };

    if let Some(limit) = options.limit {
        items.truncate(limit);
    }
    Ok(items)
}

/// Fetch one item's document and assets, then render it.
///
/// Every request holds a permit from `permits` while it runs.
async fn fetch_item(
    config: &Config,
    source: &dyn DocumentSource,
    permits: &Semaphore,
    id: ItemId,
) -> Result<MirroredItem> {
    let doc_path = format!("{}/{}", id, config.source.document_name);
    let text = {
        let _permit = permits.acquire().await.context("Request limiter closed")?;
        source
            .fetch_text(&doc_path)
            .await
            .with_context(|| format!("Failed to fetch {} ({})", id, source.describe(&doc_path)))?
    };

    let links = find_asset_links(&text, &config.assets.extensions);
    let assets: Vec<Asset> = stream::iter(links)
        .map(|link| fetch_asset(config, source, permits, &id, link))
        .buffered(config.http.concurrency)
        .try_collect()
        .await?;

    let mut markdown = text;
    for asset in &assets {
        let target = static_link(&config.output.static_link_prefix, &id, &asset.local_name);
        markdown = rewrite_asset_link(&markdown, &asset.link, &target);
    }
    let markdown = render_document(&markdown, &id, config);

    Ok(MirroredItem {
        id,
        markdown,
        assets,
    })
}

async fn fetch_asset(
    config: &Config,
    source: &dyn DocumentSource,
    permits: &Semaphore,
    id: &ItemId,
    link: String,
) -> Result<Asset> {
    let remote = remote_path(id, &link);
    let _permit = permits.acquire().await.context("Request limiter closed")?;
    let bytes = source
        .fetch_bytes(&remote)
        .await
        .with_context(|| format!("Failed to fetch asset of {} ({})", id, source.describe(&remote)))?;
    tracing::debug!(item = %id, %link, size = bytes.len(), "asset fetched");
    Ok(Asset {
        local_name: local_name(&link, &config.assets.rename),
        remote_path: remote,
        link,
        bytes,
    })
}

/// Store one item. Returns (assets written, bytes written).
fn write_item(
    config: &Config,
    item: &MirroredItem,
    reporter: &dyn SyncProgressReporter,
) -> Result<(usize, u64)> {
    let mut bytes = 0u64;

    if !item.assets.is_empty() {
        output::reset_dir(&output::asset_dir(&config.output.static_dir, &item.id))?;
    }
    for asset in &item.assets {
        let path = output::write_asset(
            &config.output.static_dir,
            &item.id,
            &asset.local_name,
            &asset.bytes,
        )
        .with_context(|| format!("Failed to store asset {} of {}", asset.remote_path, item.id))?;
        bytes += asset.bytes.len() as u64;
        tracing::debug!(item = %item.id, remote = %asset.remote_path, path = %path.display(), "asset written");
        reporter.report(SyncProgressEvent::Asset {
            item: item.id.to_string(),
            path: path.display().to_string(),
        });
    }

    let path = output::write_document(&config.output.docs_dir, &item.id, &item.markdown)?;
    bytes += item.markdown.len() as u64;
    tracing::info!(item = %item.id, path = %path.display(), "document written");

    Ok((item.assets.len(), bytes))
}
