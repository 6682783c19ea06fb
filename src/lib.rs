//! Reel - A local-first screenplay composition tool
//!
//! Writers edit an ordered sequence of typed lines (scene headings, action,
//! character cues, dialogue, ...). Reel folds that sequence into a structured
//! screenplay of scenes and characters, flattens it back for editing, offers
//! completions for headings and speakers, and exports formatted plain text.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{ElementType, EditSession, Screenplay, Script, ScriptId};
