//! Writes mirrored pages and assets to disk.

use anyhow::{bail, Context, Result};
use std::path::{Component, Path, PathBuf};

use crate::models::ItemId;

/// Remove `path` recursively if present, then recreate it empty.
pub fn reset_dir(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("Failed to clear directory: {}", path.display()))?;
    }
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    Ok(())
}

pub fn document_path(docs_dir: &Path, item: &ItemId) -> PathBuf {
    docs_dir.join(format!("{}.md", item))
}

pub fn asset_dir(static_dir: &Path, item: &ItemId) -> PathBuf {
    static_dir.join(item.as_str())
}

/// Write `<docs_dir>/<item>.md`, returning the path.
pub fn write_document(docs_dir: &Path, item: &ItemId, markdown: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(docs_dir)
        .with_context(|| format!("Failed to create directory: {}", docs_dir.display()))?;
    let path = document_path(docs_dir, item);
    std::fs::write(&path, markdown)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Write one asset under `<static_dir>/<item>/`, creating nested directories.
///
/// `local_name` must be a plain relative path; anything that could resolve
/// outside the item's asset directory is refused.
pub fn write_asset(
    static_dir: &Path,
    item: &ItemId,
    local_name: &str,
    bytes: &[u8],
) -> Result<PathBuf> {
    let dir = asset_dir(static_dir, item);
    let relative = Path::new(local_name);
    if local_name.is_empty()
        || !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        bail!(
            "Refusing to write asset '{}' outside {}",
            local_name,
            dir.display()
        );
    }
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reset_dir_clears_previous_contents() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("docs");
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("stale.md"), "old").unwrap();

        reset_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn writes_document_and_nested_asset() {
        let tmp = TempDir::new().unwrap();
        let item = ItemId::new("CIP-0030");

        let doc = write_document(&tmp.path().join("docs"), &item, "# hi").unwrap();
        assert_eq!(doc, tmp.path().join("docs").join("CIP-0030.md"));
        assert_eq!(std::fs::read_to_string(&doc).unwrap(), "# hi");

        let asset = write_asset(&tmp.path().join("static"), &item, "img/a.png", b"png").unwrap();
        assert_eq!(
            asset,
            tmp.path().join("static").join("CIP-0030").join("img/a.png")
        );
        assert_eq!(std::fs::read(&asset).unwrap(), b"png");
    }

    #[test]
    fn write_asset_refuses_escaping_names() {
        let tmp = TempDir::new().unwrap();
        let static_dir = tmp.path().join("static");
        let item = ItemId::new("CIP-0030");
        let outside = tmp.path().join("outside.png");

        for name in [
            outside.to_str().unwrap(),
            "../CIP-0001/x.png",
            "img/../../x.png",
            "./x.png",
            "",
        ] {
            let err = write_asset(&static_dir, &item, name, b"png").unwrap_err();
            assert!(err.to_string().contains("Refusing"), "{}: {}", name, err);
        }
        assert!(!outside.exists());
        assert!(!static_dir.join("CIP-0001").exists());
    }
}
