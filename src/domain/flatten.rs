//! Structure flattener
//!
//! Inverse of the builder: walks every scene, extracts each stored entry as a
//! typed record and sorts the records by `line_number` to restore authoring
//! order.
//!
//! Character lines are not stored in scenes. They are recovered from the
//! speaker attached to dialogue and parenthetical entries: a `character`
//! record is emitted at the line number of the first speech line of each run
//! by the same speaker, and always sorts before that line.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::element::{wrap_parenthetical, ElementType};
use super::screenplay::{LineEntry, Screenplay};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("Invalid line numbering: line number {line_number} is zero or appears more than once")]
    InvalidLineNumbering { line_number: u32 },
}

/// One line of a flattened screenplay
///
/// Parenthetical text is bare; use [`FlatLine::display_text`] to get it
/// wrapped in parens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatLine {
    pub line_number: u32,
    #[serde(rename = "type")]
    pub element: ElementType,
    pub text: String,
}

impl FlatLine {
    pub fn new(line_number: u32, element: ElementType, text: impl Into<String>) -> Self {
        Self {
            line_number,
            element,
            text: text.into(),
        }
    }

    /// Text as the writer sees it on the page
    pub fn display_text(&self) -> String {
        match self.element {
            ElementType::Parenthetical => wrap_parenthetical(&self.text),
            _ => self.text.clone(),
        }
    }
}

/// A stored entry waiting to be sorted
struct Extracted<'a> {
    entry: &'a LineEntry,
    element: ElementType,
    speaker: Option<&'a str>,
}

impl<'a> Extracted<'a> {
    fn plain(entry: &'a LineEntry, element: ElementType) -> Self {
        Self {
            entry,
            element,
            speaker: None,
        }
    }
}

/// Flattens a screenplay back into an ordered line sequence
///
/// Fails with [`StructureError::InvalidLineNumbering`] if a stored entry has
/// line number zero or shares its number with another stored entry.
pub fn flatten(screenplay: &Screenplay) -> Result<Vec<FlatLine>, StructureError> {
    let mut extracted = Vec::with_capacity(screenplay.line_count());

    for scene in &screenplay.scenes {
        extracted.extend(
            scene
                .heading
                .iter()
                .map(|e| Extracted::plain(e, ElementType::SceneHeading)),
        );
        extracted.extend(
            scene
                .screen_actions
                .iter()
                .map(|e| Extracted::plain(e, ElementType::Action)),
        );
        extracted.extend(scene.shots.iter().map(|e| Extracted::plain(e, ElementType::Shot)));
        extracted.extend(scene.notes.iter().map(|e| Extracted::plain(e, ElementType::Note)));
        extracted.extend(scene.dialogues.iter().map(|d| Extracted {
            entry: &d.line,
            element: ElementType::Dialogue,
            speaker: Some(d.character.as_str()),
        }));
        extracted.extend(scene.parentheticals.iter().map(|p| Extracted {
            entry: &p.line,
            element: ElementType::Parenthetical,
            speaker: Some(p.character.as_str()),
        }));
        extracted.extend(
            scene
                .transitions
                .iter()
                .map(|e| Extracted::plain(e, ElementType::Transition)),
        );
    }

    let mut seen = HashSet::with_capacity(extracted.len());
    for item in &extracted {
        let line_number = item.entry.line_number;
        if line_number == 0 || !seen.insert(line_number) {
            return Err(StructureError::InvalidLineNumbering { line_number });
        }
    }

    extracted.sort_by_key(|item| item.entry.line_number);

    let mut lines = Vec::with_capacity(extracted.len());
    let mut speaking: Option<&str> = None;

    for item in extracted {
        let line_number = item.entry.line_number;
        match item.speaker {
            Some(speaker) => {
                if speaking != Some(speaker) {
                    lines.push(FlatLine::new(line_number, ElementType::Character, speaker));
                    speaking = Some(speaker);
                }
            }
            None => speaking = None,
        }
        lines.push(FlatLine::new(line_number, item.element, item.entry.text.as_str()));
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::build;
    use crate::domain::element::normalize;
    use crate::domain::screenplay::{DialogueEntry, Scene};
    use proptest::prelude::*;
    use ElementType::*;

    fn typed(lines: &[FlatLine]) -> Vec<(ElementType, String)> {
        lines.iter().map(|l| (l.element, l.text.clone())).collect()
    }

    fn normalize_all(lines: &[(ElementType, &str)]) -> Vec<(ElementType, String)> {
        lines.iter().map(|(t, s)| (*t, normalize(*t, s))).collect()
    }

    #[test]
    fn empty_screenplay_flattens_to_nothing() {
        assert_eq!(flatten(&Screenplay::new()).unwrap(), vec![]);
    }

    #[test]
    fn round_trip_full_scene() {
        let lines = [
            (SceneHeading, "int. kitchen - night"),
            (Action, "rain against the window."),
            (Shot, "close on the kettle"),
            (Character, "mara"),
            (Parenthetical, "(whispering)"),
            (Dialogue, "did you hear that?"),
            (Dialogue, "there it is again."),
            (Character, "joe"),
            (Dialogue, "it's the pipes."),
            (Note, "check pacing"),
            (Character, "mara"),
            (Dialogue, "it's not the pipes."),
            (Transition, "smash cut to:"),
            (SceneHeading, "ext. street - night"),
            (Action, "empty."),
        ];

        let flat = flatten(&build(lines)).unwrap();
        assert_eq!(typed(&flat), normalize_all(&lines));
    }

    #[test]
    fn line_numbers_follow_authoring_order() {
        let flat = flatten(&build([
            (SceneHeading, "INT. ROOM"),
            (Character, "BOB"),
            (Dialogue, "Hi."),
            (Action, "He sits."),
        ]))
        .unwrap();

        let numbers: Vec<u32> = flat.iter().map(|l| l.line_number).collect();
        // The character record shares the number of its dialogue line.
        assert_eq!(numbers, vec![1, 3, 3, 4]);
    }

    #[test]
    fn character_precedes_parenthetical_that_opens_speech() {
        let flat = flatten(&build([
            (Character, "BOB"),
            (Parenthetical, "beat"),
            (Dialogue, "Fine."),
        ]))
        .unwrap();

        assert_eq!(
            flat,
            vec![
                FlatLine::new(2, Character, "BOB"),
                FlatLine::new(2, Parenthetical, "beat"),
                FlatLine::new(3, Dialogue, "Fine."),
            ]
        );
        assert_eq!(flat[1].display_text(), "(beat)");
    }

    #[test]
    fn dropped_lines_are_the_only_loss() {
        let lines = [
            (Dialogue, "Nobody said this."),
            (Action, "A door opens."),
            (Parenthetical, "(to no one)"),
        ];

        let flat = flatten(&build(lines)).unwrap();
        assert_eq!(flat, vec![FlatLine::new(2, Action, "A door opens.")]);
    }

    #[test]
    fn speaker_reintroduced_after_interruption() {
        let flat = flatten(&build([
            (Character, "BOB"),
            (Dialogue, "One."),
            (Action, "He coughs."),
            (Dialogue, "Two."),
        ]))
        .unwrap();

        let elements: Vec<ElementType> = flat.iter().map(|l| l.element).collect();
        assert_eq!(elements, vec![Character, Dialogue, Action, Character, Dialogue]);
    }

    #[test]
    fn zero_line_number_is_rejected() {
        let mut scene = Scene::implicit();
        scene.screen_actions.push(LineEntry::new(0, "Bad."));
        let screenplay = Screenplay {
            scenes: vec![scene],
            characters: vec![],
        };

        assert_eq!(
            flatten(&screenplay),
            Err(StructureError::InvalidLineNumbering { line_number: 0 })
        );
    }

    #[test]
    fn duplicate_line_number_is_rejected() {
        let mut scene = Scene::with_heading(LineEntry::new(1, "INT. ROOM"));
        scene.screen_actions.push(LineEntry::new(2, "A."));
        scene.dialogues.push(DialogueEntry {
            character: "BOB".to_string(),
            line: LineEntry::new(2, "B."),
        });
        let screenplay = Screenplay {
            scenes: vec![scene],
            characters: vec![],
        };

        assert_eq!(
            flatten(&screenplay),
            Err(StructureError::InvalidLineNumbering { line_number: 2 })
        );
    }

    #[test]
    fn records_sort_across_scenes() {
        // Hand-built structure whose scene order disagrees with numbering.
        let late = Scene::with_heading(LineEntry::new(5, "EXT. LATE"));
        let early = Scene::with_heading(LineEntry::new(2, "INT. EARLY"));
        let screenplay = Screenplay {
            scenes: vec![late, early],
            characters: vec![],
        };

        let flat = flatten(&screenplay).unwrap();
        assert_eq!(flat[0].text, "INT. EARLY");
        assert_eq!(flat[1].text, "EXT. LATE");
    }

    /// Generates line sequences the builder consumes without loss: every
    /// speech run is opened by a character line, and a character line is
    /// always followed by speech.
    fn canonical_lines() -> impl Strategy<Value = Vec<(ElementType, String)>> {
        let word = "[a-z]{1,8}";
        let block = prop_oneof![
            word.prop_map(|w| vec![(SceneHeading, format!("int. {}", w))]),
            word.prop_map(|w| vec![(Action, w)]),
            word.prop_map(|w| vec![(Note, w)]),
            word.prop_map(|w| vec![(Shot, w)]),
            word.prop_map(|w| vec![(Transition, format!("{} to:", w))]),
            (word, prop::collection::vec((any::<bool>(), word), 1..4)).prop_map(|(name, speech)| {
                let mut lines = vec![(Character, name)];
                for (is_paren, text) in speech {
                    let element = if is_paren { Parenthetical } else { Dialogue };
                    lines.push((element, text));
                }
                lines
            }),
        ];
        prop::collection::vec(block, 0..12).prop_map(|blocks| {
            // Two adjacent speeches by the same speaker are one run on the page.
            let mut lines = Vec::new();
            let mut run: Option<String> = None;
            for (element, text) in blocks.into_iter().flatten() {
                match element {
                    Character => {
                        let name = normalize(Character, &text);
                        if run.as_deref() == Some(name.as_str()) {
                            continue;
                        }
                        run = Some(name);
                    }
                    Dialogue | Parenthetical => {}
                    _ => run = None,
                }
                lines.push((element, text));
            }
            lines
        })
    }

    proptest! {
        #[test]
        fn flatten_inverts_build(lines in canonical_lines()) {
            let expected: Vec<(ElementType, String)> =
                lines.iter().map(|(t, s)| (*t, normalize(*t, s))).collect();
            let flat = flatten(&build(lines)).unwrap();
            prop_assert_eq!(typed(&flat), expected);
        }
    }
}
