//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Script | Project records | `script new`, `script list`, `script select` |
//! | Content | Lines in and out | `import`, `lines`, `export` |
//! | Writing aids | Completion and line flow | `suggest`, `next` |
//! | Editor | Interactive writing | `write` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! reel --verbose import draft.txt
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod screenplay_cmd;
mod script_cmd;
mod tui;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
