//! TOML configuration.
//!
//! Every section has defaults that point at the Cardano CIP repository, so
//! an empty (or missing) config file mirrors CIPs into a Docusaurus tree.
//!
//! ```toml
//! [source]
//! raw_base_url = "https://raw.githubusercontent.com/cardano-foundation/CIPs/master"
//! item_pattern = "(CIP-\\d{4})/"
//!
//! [output]
//! docs_dir = "./docs/governance/cardano-improvement-proposals"
//!
//! [http]
//! concurrency = 8
//! ```

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Where the proposals live.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL serving raw file contents.
    pub raw_base_url: String,
    /// Base URL of the browsable repository, used in the generated notice.
    pub web_base_url: String,
    /// Human-readable repository name, e.g. `cardano-foundation/CIPs`.
    pub repo_name: String,
    /// Path of the index document relative to `raw_base_url`.
    pub index_path: String,
    /// File name of each item's document inside its directory.
    pub document_name: String,
    /// Regex locating item identifiers in the index. Group 1 wins if present.
    pub item_pattern: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            raw_base_url: "https://raw.githubusercontent.com/cardano-foundation/CIPs/master"
                .to_string(),
            web_base_url: "https://github.com/cardano-foundation/CIPs/tree/master".to_string(),
            repo_name: "cardano-foundation/CIPs".to_string(),
            index_path: "README.md".to_string(),
            document_name: "README.md".to_string(),
            item_pattern: r"(CIP-\d{4})/".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// Cleared and recreated on every full sync.
    pub docs_dir: PathBuf,
    /// Root of the per-item asset directories.
    pub static_dir: PathBuf,
    /// Prefix written into rewritten asset links, relative to the docs page.
    pub static_link_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("./docs/governance/cardano-improvement-proposals"),
            static_dir: PathBuf::from("./static/img/cip"),
            static_link_prefix: "../../../static/img/cip".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AssetsConfig {
    /// Link target extensions that are downloaded as assets.
    pub extensions: Vec<String>,
    /// Extension renames applied to the stored file (`json` -> `txt` keeps
    /// the static site from trying to import it).
    pub rename: BTreeMap<String, String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            extensions: ["png", "jpg", "jpeg", "json"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rename: BTreeMap::from([("json".to_string(), "txt".to_string())]),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RenderConfig {
    /// Short proposal family name, used in the notice heading.
    pub label: String,
    /// Prefix of sibling item links, for `](../CIP-` -> `](./CIP-`.
    pub item_link_prefix: String,
    pub number_tag: String,
    pub title_tag: String,
    pub type_tag: String,
    pub status_tag: String,
    pub created_tag: String,
    /// Level-1 headings with these keywords are demoted to level 2.
    pub demote_headings: Vec<String>,
    pub format_link: String,
    pub workflow_link: String,
    pub fixups: Vec<Fixup>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            label: "CIP".to_string(),
            item_link_prefix: "CIP-".to_string(),
            number_tag: "CIP".to_string(),
            title_tag: "Title".to_string(),
            type_tag: "Type".to_string(),
            status_tag: "Status".to_string(),
            created_tag: "Created".to_string(),
            demote_headings: ["Abstract", "Motivation", "Specification", "Rationale", "Copyright"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            format_link: "CIP-0001#cip-format-and-structure".to_string(),
            workflow_link: "CIP-0001#cip-workflow".to_string(),
            fixups: default_fixups(),
        }
    }
}

/// A literal find/replace applied after rendering.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Fixup {
    /// Restrict to one item; applies to all items when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    pub find: String,
    #[serde(default)]
    pub replace: String,
}

fn default_fixups() -> Vec<Fixup> {
    vec![
        Fixup {
            item: None,
            find: "* License: \n* License-Code:\n* Post-History:\n* Requires:\n* Replaces:\n* Superseded-By:\n"
                .to_string(),
            replace: String::new(),
        },
        Fixup {
            item: Some("CIP-0060".to_string()),
            find: "cddl/version-1.cddl".to_string(),
            replace:
                "https://github.com/cardano-foundation/CIPs/blob/master/CIP-0060/cddl/version-1.cddl"
                    .to_string(),
        },
    ]
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    /// Maximum number of requests in flight, documents and assets together.
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout_secs: 30,
            user_agent: format!("pmirror/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Compiled item pattern. Only fails on configs that skipped [`Config::validate`].
    pub fn item_regex(&self) -> Result<Regex> {
        Regex::new(&self.source.item_pattern)
            .with_context(|| format!("Invalid source.item_pattern: {}", self.source.item_pattern))
    }

    pub fn validate(&self) -> Result<()> {
        for (key, url) in [
            ("source.raw_base_url", &self.source.raw_base_url),
            ("source.web_base_url", &self.source.web_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("{} must be an http(s) URL, got '{}'", key, url);
            }
        }

        if self.source.document_name.trim().is_empty() {
            bail!("source.document_name must not be empty");
        }

        self.item_regex()?;

        if self.assets.extensions.is_empty() {
            bail!("assets.extensions must list at least one extension");
        }
        if let Some(ext) = self
            .assets
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.starts_with('.'))
        {
            bail!(
                "assets.extensions entries must be bare extensions like 'png', got '{}'",
                ext
            );
        }

        if self.http.concurrency == 0 {
            bail!("http.concurrency must be >= 1");
        }
        if self.http.timeout_secs == 0 {
            bail!("http.timeout_secs must be >= 1");
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::minimal())
    }
}

/// Write the default configuration to `path` (`pmirror init`).
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let body = toml::to_string_pretty(&Config::minimal())?;
    std::fs::write(path, body)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}
