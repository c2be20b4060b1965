//! # Proposal Mirror
//!
//! Mirrors markdown proposal documents (Cardano CIPs by default) from a
//! remote repository into a local static-site documentation tree.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌──────────────┐   ┌───────────┐   ┌──────────┐
//! │  index   │──▶│  item ids │──▶│ doc + assets │──▶│ transform │──▶│  output  │
//! │ README.md│   │ CIP-0001… │   │   (HTTP)     │   │  (regex)  │   │ docs/ +  │
//! └──────────┘   └───────────┘   └──────────────┘   └───────────┘   │ static/  │
//!                                                                   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! pmirror sync                  # mirror every item into ./docs and ./static
//! pmirror sync --dry-run        # show what would be mirrored
//! pmirror list                  # print item ids from the index
//! pmirror render README.md --item CIP-0001
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration with CIP defaults |
//! | [`models`] | Core data types |
//! | [`source`] | Remote document source (HTTP) |
//! | [`index`] | Item id extraction |
//! | [`assets`] | Asset link discovery and rewriting |
//! | [`transform`] | Markdown substitutions |
//! | [`output`] | File writes |
//! | [`sync`] | Pipeline orchestration |
//! | [`progress`] | Progress reporting on stderr |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`render_cmd`] | `pmirror render` |

pub mod assets;
pub mod config;
pub mod index;
pub mod logging;
pub mod models;
pub mod output;
pub mod progress;
pub mod render_cmd;
pub mod source;
pub mod sync;
pub mod transform;
