//! Tagged plain-text drafts
//!
//! A draft file holds one screenplay line per text line, prefixed with its
//! type tag:
//!
//! ```text
//! scene-heading: INT. KITCHEN - NIGHT
//! action: Rain against the window.
//! character: MARA
//! parenthetical: (whispering)
//! dialogue: Did you hear that?
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Lines whose tag is
//! missing or unrecognized are skipped and reported, never fatal.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{classify, DraftLine, FlatLine};

/// Why a draft line was left out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "tag")]
pub enum SkipReason {
    /// No `tag:` prefix
    MissingTag,
    /// Tag is not one of the known line types
    UnknownTag(String),
}

/// A draft line that did not make it into the sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the source file
    pub source_line: usize,
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl std::fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            SkipReason::MissingTag => write!(f, "line {}: missing type tag", self.source_line),
            SkipReason::UnknownTag(tag) => {
                write!(f, "line {}: unknown type '{}'", self.source_line, tag)
            }
        }
    }
}

/// Result of parsing a draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDraft {
    pub lines: Vec<DraftLine>,
    pub skipped: Vec<SkippedLine>,
}

/// Parses draft text into typed lines
pub fn parse(content: &str) -> ParsedDraft {
    let mut draft = ParsedDraft::default();

    for (idx, raw) in content.lines().enumerate() {
        let source_line = idx + 1;
        if raw.trim().is_empty() || raw.trim_start().starts_with('#') {
            continue;
        }

        let Some((tag, text)) = raw.split_once(':') else {
            draft.skipped.push(SkippedLine {
                source_line,
                reason: SkipReason::MissingTag,
            });
            continue;
        };

        match classify(tag) {
            Some(element) => {
                let text = text.strip_prefix(' ').unwrap_or(text);
                draft.lines.push(DraftLine::new(element, text));
            }
            None => draft.skipped.push(SkippedLine {
                source_line,
                reason: SkipReason::UnknownTag(tag.trim().to_string()),
            }),
        }
    }

    draft
}

/// Renders flattened lines as draft text
pub fn render(lines: &[FlatLine]) -> String {
    let mut out = String::new();
    for line in lines {
        let text = line.display_text();
        if text.is_empty() {
            out.push_str(&format!("{}:\n", line.element));
        } else {
            out.push_str(&format!("{}: {}\n", line.element, text));
        }
    }
    out
}

/// Reads and parses a draft file
pub fn read(path: &Path) -> Result<ParsedDraft> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft: {}", path.display()))?;
    Ok(parse(&content))
}
