//! Line type taxonomy and text normalization
//!
//! Every line of a screenplay carries exactly one [`ElementType`]. The type
//! decides how the line's text is normalized, which type follows it when the
//! writer breaks the line, and how it is spaced on export.
//!
//! | Type | Normalization |
//! |------|---------------|
//! | scene-heading, character, transition, shot | whole text uppercased |
//! | action, dialogue, note | first character uppercased |
//! | parenthetical | one leading `(` and one trailing `)` stripped |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Structural type of a screenplay line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementType {
    /// `INT. ROOM - DAY`
    SceneHeading,
    Action,
    /// Name of the speaker for the dialogue that follows
    Character,
    /// Acting direction inside a speech, shown wrapped in parens
    Parenthetical,
    Dialogue,
    /// `CUT TO:` and friends; always closes the current scene
    Transition,
    Shot,
    Note,
}

impl ElementType {
    /// Returns all element types in declaration order
    pub fn all() -> &'static [ElementType] {
        &[
            ElementType::SceneHeading,
            ElementType::Action,
            ElementType::Character,
            ElementType::Parenthetical,
            ElementType::Dialogue,
            ElementType::Transition,
            ElementType::Shot,
            ElementType::Note,
        ]
    }

    /// Returns the kebab-case identifier (`scene-heading`, `action`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::SceneHeading => "scene-heading",
            ElementType::Action => "action",
            ElementType::Character => "character",
            ElementType::Parenthetical => "parenthetical",
            ElementType::Dialogue => "dialogue",
            ElementType::Transition => "transition",
            ElementType::Shot => "shot",
            ElementType::Note => "note",
        }
    }

    /// Returns the next type in declaration order, wrapping around
    pub fn cycle_next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|t| *t == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Returns true if the whole text of this type is uppercased
    pub fn is_uppercase(&self) -> bool {
        matches!(
            self,
            ElementType::SceneHeading
                | ElementType::Character
                | ElementType::Transition
                | ElementType::Shot
        )
    }

    /// Returns true for the types that only exist inside a speech
    pub fn is_speech(&self) -> bool {
        matches!(self, ElementType::Dialogue | ElementType::Parenthetical)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        classify(s).ok_or_else(|| format!("Unknown element type: {}", s))
    }
}

/// Classifies a type tag handed over by the editing surface
///
/// Returns `None` for unrecognized tags. Callers skip such lines and warn.
pub fn classify(tag: &str) -> Option<ElementType> {
    match tag.trim().to_lowercase().as_str() {
        "scene-heading" | "scene_heading" | "scene" | "heading" => {
            Some(ElementType::SceneHeading)
        }
        "action" => Some(ElementType::Action),
        "character" | "char" => Some(ElementType::Character),
        "parenthetical" | "paren" => Some(ElementType::Parenthetical),
        "dialogue" => Some(ElementType::Dialogue),
        "transition" | "trans" => Some(ElementType::Transition),
        "shot" => Some(ElementType::Shot),
        "note" => Some(ElementType::Note),
        _ => None,
    }
}

/// Normalizes raw text for the given type
///
/// Idempotent for every type except parenthetical, which strips one paren
/// layer per call: `"((aside))"` needs two calls to reach `"aside"`.
pub fn normalize(element: ElementType, text: &str) -> String {
    match element {
        ElementType::SceneHeading
        | ElementType::Character
        | ElementType::Transition
        | ElementType::Shot => text.to_uppercase(),
        ElementType::Action | ElementType::Dialogue | ElementType::Note => capitalize_first(text),
        ElementType::Parenthetical => strip_parenthetical(text).to_string(),
    }
}

/// Strips at most one leading `(` and one trailing `)`, balanced or not
pub fn strip_parenthetical(text: &str) -> &str {
    let text = text.strip_prefix('(').unwrap_or(text);
    text.strip_suffix(')').unwrap_or(text)
}

/// Wraps bare parenthetical text in parens
pub fn wrap_parenthetical(text: &str) -> String {
    format!("({})", text)
}

/// Text a freshly inserted line of this type starts with
pub fn placeholder(element: ElementType) -> &'static str {
    match element {
        ElementType::Parenthetical => "()",
        _ => "",
    }
}

/// Type of the line created when the writer breaks after `current`
///
/// `None` means there is no active line.
pub fn next_type(current: Option<ElementType>) -> ElementType {
    match current {
        Some(ElementType::Character) | Some(ElementType::Parenthetical) => ElementType::Dialogue,
        Some(ElementType::Transition) => ElementType::SceneHeading,
        Some(ElementType::Dialogue)
        | Some(ElementType::SceneHeading)
        | Some(ElementType::Action)
        | Some(ElementType::Shot)
        | Some(ElementType::Note)
        | None => ElementType::Action,
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
