//! # Storage Layer
//!
//! Persistence for Reel projects in plain, git-friendly files.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Scripts | Pretty JSON, one file per script | `.screenplay/scripts/{id}.json` |
//! | Config | TOML | `.screenplay/config.toml` |
//! | Drafts | Tagged text (`type: text` per line) | anywhere, for import |
//!
//! ## Concurrency Safety
//!
//! - [`ScriptStore`] takes `fs2` file locks (shared for reads, exclusive for writes)
//! - All writes are atomic (temp file + rename)
//!
//! ## Project Structure
//!
//! ```text
//! .screenplay/
//! ├── scripts/
//! │   └── s-1234567.json    # Script record with its screenplay
//! ├── config.toml           # Project configuration
//! └── .gitignore            # Ignores interrupted writes
//! ```

pub mod draft;
mod config;
mod project;
mod script_store;

pub use config::{
    Config, ConfigError, EditorConfig, GlobalConfig, OutputFormat, ProjectConfig, SuggestionConfig,
};
pub use draft::{ParsedDraft, SkipReason, SkippedLine};
pub use project::{Project, ProjectError};
pub use script_store::{ScriptStore, StoreError};
