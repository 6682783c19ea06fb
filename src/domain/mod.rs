//! Domain models for the screenplay core
//!
//! Contains the line taxonomy, the line-sequence/structure transforms and the
//! formatting rules, without any I/O concerns.
//!
//! ```text
//! typed lines ──build──▶ Screenplay ──flatten──▶ numbered lines ──export──▶ text
//!      ▲                     │
//!      └──── EditSession ◀───┘ (suggestions, speaker history)
//! ```

mod builder;
mod element;
mod export;
mod flatten;
mod id;
mod screenplay;
mod script;
mod session;
mod suggest;

pub use builder::{build, build_with_history, BuiltScreenplay, Builder, LineLoss};
pub use element::{
    classify, next_type, normalize, placeholder, strip_parenthetical, wrap_parenthetical,
    ElementType,
};
pub use export::{export, export_lines};
pub use flatten::{flatten, FlatLine, StructureError};
pub use id::{IdError, ScriptId};
pub use screenplay::{Character, DialogueEntry, LineEntry, ParentheticalEntry, Scene, Screenplay};
pub use script::Script;
pub use session::{DraftLine, EditSession};
pub use suggest::{prior_speaker, suggest, Suggestions};
