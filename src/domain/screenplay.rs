//! Hierarchical screenplay model
//!
//! A [`Screenplay`] is built wholesale from an ordered line sequence and is
//! never patched in place. Entries keep no explicit position other than the
//! `line_number` assigned once during the build; that number is the only key
//! used to restore authoring order when flattening.
//!
//! The serialized form is the durable record handed to storage:
//!
//! ```text
//! { "scenes": [ { "heading": {"line_number": 1, "text": "INT. ROOM"} | null,
//!                 "screen_actions": [..], "notes": [..], "shots": [..],
//!                 "transitions": [..],
//!                 "dialogues": [ {"character": "BOB", "line": {..}} ],
//!                 "parentheticals": [ {"character": "BOB", "line": {..}} ] } ],
//!   "characters": [ {"name": "BOB", "dialogue": [..]} ] }
//! ```

use serde::{Deserialize, Serialize};

/// A numbered line of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEntry {
    /// Position in authoring order, starting at 1
    pub line_number: u32,
    pub text: String,
}

impl LineEntry {
    pub fn new(line_number: u32, text: impl Into<String>) -> Self {
        Self {
            line_number,
            text: text.into(),
        }
    }
}

/// A dialogue line attributed to the speaker active when it was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueEntry {
    pub character: String,
    pub line: LineEntry,
}

/// A parenthetical attributed to the speaker active when it was written
///
/// Text is stored without its surrounding parens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentheticalEntry {
    pub character: String,
    pub line: LineEntry,
}

/// A scene and everything written inside it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// `None` for an implicit scene opened by content before any heading
    pub heading: Option<LineEntry>,

    #[serde(default)]
    pub screen_actions: Vec<LineEntry>,

    #[serde(default)]
    pub notes: Vec<LineEntry>,

    #[serde(default)]
    pub shots: Vec<LineEntry>,

    #[serde(default)]
    pub transitions: Vec<LineEntry>,

    #[serde(default)]
    pub dialogues: Vec<DialogueEntry>,

    #[serde(default)]
    pub parentheticals: Vec<ParentheticalEntry>,
}

impl Scene {
    /// Creates a scene opened by a heading line
    pub fn with_heading(heading: LineEntry) -> Self {
        Self {
            heading: Some(heading),
            ..Self::default()
        }
    }

    /// Creates an implicit scene with no heading
    pub fn implicit() -> Self {
        Self::default()
    }

    /// Returns true if this scene was opened without a heading
    pub fn is_implicit(&self) -> bool {
        self.heading.is_none()
    }

    /// Returns the heading text, if any
    pub fn heading_text(&self) -> Option<&str> {
        self.heading.as_ref().map(|h| h.text.as_str())
    }

    /// Number of stored entries in this scene, heading included
    pub fn line_count(&self) -> usize {
        usize::from(self.heading.is_some())
            + self.screen_actions.len()
            + self.notes.len()
            + self.shots.len()
            + self.transitions.len()
            + self.dialogues.len()
            + self.parentheticals.len()
    }
}

/// A speaking character and every dialogue line attributed to them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Normalized (uppercase) name
    pub name: String,

    #[serde(default)]
    pub dialogue: Vec<LineEntry>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dialogue: Vec::new(),
        }
    }
}

/// Aggregate root: scenes in authoring order plus first-seen characters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenplay {
    #[serde(default)]
    pub scenes: Vec<Scene>,

    #[serde(default)]
    pub characters: Vec<Character>,
}

impl Screenplay {
    /// Creates an empty screenplay
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are no scenes and no characters
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty() && self.characters.is_empty()
    }

    /// Number of stored entries across all scenes
    pub fn line_count(&self) -> usize {
        self.scenes.iter().map(Scene::line_count).sum()
    }

    /// Distinct non-empty heading texts in first-seen order
    pub fn scene_headings(&self) -> Vec<&str> {
        let mut headings: Vec<&str> = Vec::new();
        for text in self.scenes.iter().filter_map(Scene::heading_text) {
            if !text.is_empty() && !headings.contains(&text) {
                headings.push(text);
            }
        }
        headings
    }

    /// Character names in first-seen order
    pub fn character_names(&self) -> Vec<&str> {
        self.characters.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks up a character by normalized name
    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub(crate) fn character_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_field_names() {
        let mut scene = Scene::with_heading(LineEntry::new(1, "INT. ROOM"));
        scene.dialogues.push(DialogueEntry {
            character: "BOB".to_string(),
            line: LineEntry::new(3, "Hi."),
        });
        let screenplay = Screenplay {
            scenes: vec![scene, Scene::implicit()],
            characters: vec![Character::new("BOB")],
        };

        let value = serde_json::to_value(&screenplay).unwrap();
        assert_eq!(value["scenes"][0]["heading"]["line_number"], 1);
        assert_eq!(value["scenes"][0]["dialogues"][0]["character"], "BOB");
        assert_eq!(value["scenes"][0]["dialogues"][0]["line"]["text"], "Hi.");
        assert!(value["scenes"][1]["heading"].is_null());
        assert!(value["scenes"][1]["screen_actions"].is_array());
        assert_eq!(value["characters"][0]["name"], "BOB");

        let back: Screenplay = serde_json::from_value(value).unwrap();
        assert_eq!(back, screenplay);
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let json = r#"{"scenes": [{"heading": null}]}"#;
        let screenplay: Screenplay = serde_json::from_str(json).unwrap();
        assert_eq!(screenplay.scenes.len(), 1);
        assert!(screenplay.scenes[0].is_implicit());
        assert!(screenplay.characters.is_empty());
    }

    #[test]
    fn headings_are_distinct_and_non_empty() {
        let screenplay = Screenplay {
            scenes: vec![
                Scene::with_heading(LineEntry::new(1, "INT. ROOM")),
                Scene::implicit(),
                Scene::with_heading(LineEntry::new(3, "")),
                Scene::with_heading(LineEntry::new(4, "EXT. STREET")),
                Scene::with_heading(LineEntry::new(5, "INT. ROOM")),
            ],
            characters: vec![],
        };

        assert_eq!(screenplay.scene_headings(), vec!["INT. ROOM", "EXT. STREET"]);
        assert_eq!(screenplay.line_count(), 4);
    }

    #[test]
    fn empty_screenplay() {
        let screenplay = Screenplay::new();
        assert!(screenplay.is_empty());
        assert_eq!(screenplay.line_count(), 0);
    }
}
