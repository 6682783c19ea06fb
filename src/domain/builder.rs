//! Single-pass structure builder
//!
//! Folds an ordered sequence of typed lines into a [`Screenplay`]. The pass
//! keeps two pieces of transient state: the scene currently open and the
//! character currently speaking.
//!
//! - A scene heading opens a new scene.
//! - Action, note and shot lines open an implicit scene if none is open.
//! - A transition is stored in the open (or implicit) scene, then closes it.
//! - A character line switches the speaker and registers the name once.
//! - Dialogue and parentheticals need an active speaker; without one they are
//!   dropped, though they still consume a line number. With a speaker but no
//!   open scene (start of script, or right after a transition) they open an
//!   implicit scene like any other content line.
//!
//! Two kinds of line get no place in the structure: speech with no speaker,
//! and character cues that never speak before the next cue or the end. Both
//! are counted in [`LineLoss`] so callers can tell the writer.

use super::element::{normalize, ElementType};
use super::screenplay::{
    Character, DialogueEntry, LineEntry, ParentheticalEntry, Scene, Screenplay,
};

/// Result of a build: the structure plus the speaker history it produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltScreenplay {
    pub screenplay: Screenplay,

    /// Normalized names in the order they became the active speaker
    pub speaker_history: Vec<String>,

    pub loss: LineLoss,
}

/// Lines that a build could not place, so flattening will not bring back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineLoss {
    /// Dialogue or parenthetical lines with no active speaker
    pub speech_without_speaker: usize,

    /// Character cues with no dialogue or parenthetical before the next cue
    /// or the end of the script
    pub cues_without_speech: usize,
}

impl LineLoss {
    pub fn total(&self) -> usize {
        self.speech_without_speaker + self.cues_without_speech
    }
}

/// Incremental builder; feed lines with [`Builder::push`] then [`Builder::finish`]
#[derive(Debug, Default)]
pub struct Builder {
    screenplay: Screenplay,
    current_scene: Option<usize>,
    current_character: Option<String>,
    speaker_history: Vec<String>,
    last_line_number: u32,
    loss: LineLoss,
    /// The current speaker has not spoken yet
    cue_pending: bool,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one raw line and returns the line number assigned to it
    pub fn push(&mut self, element: ElementType, raw_text: &str) -> u32 {
        self.last_line_number += 1;
        let entry = LineEntry::new(self.last_line_number, normalize(element, raw_text));

        match element {
            ElementType::SceneHeading => {
                self.screenplay.scenes.push(Scene::with_heading(entry));
                self.current_scene = Some(self.screenplay.scenes.len() - 1);
            }
            ElementType::Action => self.open_scene().screen_actions.push(entry),
            ElementType::Note => self.open_scene().notes.push(entry),
            ElementType::Shot => self.open_scene().shots.push(entry),
            ElementType::Transition => {
                self.open_scene().transitions.push(entry);
                self.current_scene = None;
            }
            ElementType::Character => {
                let name = entry.text;
                if self.screenplay.character(&name).is_none() {
                    self.screenplay.characters.push(Character::new(name.clone()));
                }
                self.speaker_history.push(name.clone());
                self.current_character = Some(name);
                if self.cue_pending {
                    self.loss.cues_without_speech += 1;
                }
                self.cue_pending = true;
            }
            ElementType::Dialogue => {
                let Some(name) = self.current_character.clone() else {
                    self.loss.speech_without_speaker += 1;
                    return self.last_line_number;
                };
                self.cue_pending = false;
                if let Some(character) = self.screenplay.character_mut(&name) {
                    character.dialogue.push(entry.clone());
                }
                self.open_scene().dialogues.push(DialogueEntry {
                    character: name,
                    line: entry,
                });
            }
            ElementType::Parenthetical => {
                let Some(name) = self.current_character.clone() else {
                    self.loss.speech_without_speaker += 1;
                    return self.last_line_number;
                };
                self.cue_pending = false;
                self.open_scene().parentheticals.push(ParentheticalEntry {
                    character: name,
                    line: entry,
                });
            }
        }

        self.last_line_number
    }

    /// Speaker history accumulated so far
    pub fn speaker_history(&self) -> &[String] {
        &self.speaker_history
    }

    /// Finishes the pass
    pub fn finish(mut self) -> BuiltScreenplay {
        if self.cue_pending {
            self.loss.cues_without_speech += 1;
        }
        BuiltScreenplay {
            screenplay: self.screenplay,
            speaker_history: self.speaker_history,
            loss: self.loss,
        }
    }

    /// Returns the open scene, appending an implicit one if none is open
    fn open_scene(&mut self) -> &mut Scene {
        let idx = match self.current_scene {
            Some(idx) => idx,
            None => {
                self.screenplay.scenes.push(Scene::implicit());
                let idx = self.screenplay.scenes.len() - 1;
                self.current_scene = Some(idx);
                idx
            }
        };
        &mut self.screenplay.scenes[idx]
    }
}

/// Builds a screenplay and its speaker history from typed raw lines
pub fn build_with_history<I, S>(lines: I) -> BuiltScreenplay
where
    I: IntoIterator<Item = (ElementType, S)>,
    S: AsRef<str>,
{
    let mut builder = Builder::new();
    for (element, text) in lines {
        builder.push(element, text.as_ref());
    }
    builder.finish()
}

/// Builds a screenplay from typed raw lines
pub fn build<I, S>(lines: I) -> Screenplay
where
    I: IntoIterator<Item = (ElementType, S)>,
    S: AsRef<str>,
{
    build_with_history(lines).screenplay
}

#[cfg(test)]
mod tests {
    use super::*;
    use ElementType::*;

    #[test]
    fn implicit_scene_for_leading_action() {
        let screenplay = build([(Action, "He walks in.")]);

        assert_eq!(screenplay.scenes.len(), 1);
        let scene = &screenplay.scenes[0];
        assert!(scene.is_implicit());
        assert_eq!(scene.screen_actions, vec![LineEntry::new(1, "He walks in.")]);
    }

    #[test]
    fn transition_closes_scene() {
        let screenplay = build([
            (SceneHeading, "INT. ROOM"),
            (Transition, "CUT TO:"),
            (Action, "Later."),
        ]);

        assert_eq!(screenplay.scenes.len(), 2);
        assert_eq!(screenplay.scenes[0].heading_text(), Some("INT. ROOM"));
        assert_eq!(screenplay.scenes[0].transitions, vec![LineEntry::new(2, "CUT TO:")]);
        assert!(screenplay.scenes[1].is_implicit());
        assert_eq!(screenplay.scenes[1].screen_actions, vec![LineEntry::new(3, "Later.")]);
    }

    #[test]
    fn transition_without_scene_opens_one() {
        let screenplay = build([(Transition, "fade in:")]);

        assert_eq!(screenplay.scenes.len(), 1);
        assert!(screenplay.scenes[0].is_implicit());
        assert_eq!(screenplay.scenes[0].transitions[0].text, "FADE IN:");
    }

    #[test]
    fn dialogue_linkage() {
        let screenplay = build([(Character, "BOB"), (Dialogue, "Hello.")]);

        assert_eq!(screenplay.scenes.len(), 1);
        let scene = &screenplay.scenes[0];
        assert!(scene.is_implicit());
        assert_eq!(
            scene.dialogues,
            vec![DialogueEntry {
                character: "BOB".to_string(),
                line: LineEntry::new(2, "Hello."),
            }]
        );
        assert_eq!(
            screenplay.characters,
            vec![super::Character {
                name: "BOB".to_string(),
                dialogue: vec![LineEntry::new(2, "Hello.")],
            }]
        );
    }

    #[test]
    fn dropped_dialogue_still_consumes_number() {
        let mut builder = Builder::new();
        assert_eq!(builder.push(Dialogue, "Hello."), 1);
        assert_eq!(builder.push(Action, "A pause."), 2);
        let built = builder.finish();

        let screenplay = build([(Dialogue, "Hello.")]);
        assert!(screenplay.is_empty());

        assert_eq!(built.screenplay.scenes[0].screen_actions[0].line_number, 2);
    }

    #[test]
    fn dialogue_after_transition_opens_new_scene() {
        let screenplay = build([
            (SceneHeading, "INT. ROOM"),
            (Character, "BOB"),
            (Transition, "CUT TO:"),
            (Dialogue, "Over here."),
        ]);

        assert_eq!(screenplay.scenes.len(), 2);
        assert!(screenplay.scenes[0].dialogues.is_empty());
        assert!(screenplay.scenes[1].is_implicit());
        assert_eq!(screenplay.scenes[1].dialogues[0].line, LineEntry::new(4, "Over here."));
    }

    #[test]
    fn parenthetical_without_speaker_is_dropped() {
        let screenplay = build([(SceneHeading, "INT. ROOM"), (Parenthetical, "(beat)")]);
        assert!(screenplay.scenes[0].parentheticals.is_empty());
    }

    #[test]
    fn loss_counts_unplaced_lines() {
        let built = build_with_history([
            (Dialogue, "Nobody."),
            (Character, "BOB"),
            (Character, "JOE"),
            (Transition, "CUT TO:"),
            (Dialogue, "Still Joe."),
            (Parenthetical, "(beat)"),
            (Character, "MARA"),
        ]);

        assert_eq!(
            built.loss,
            LineLoss {
                speech_without_speaker: 1,
                cues_without_speech: 2,
            }
        );
        assert_eq!(built.loss.total(), 3);
    }

    #[test]
    fn no_loss_for_canonical_exchange() {
        let built = build_with_history([
            (SceneHeading, "INT. ROOM"),
            (Character, "BOB"),
            (Parenthetical, "(quietly)"),
            (Dialogue, "Hello."),
            (Action, "He sits."),
            (Dialogue, "Again."),
        ]);

        assert_eq!(built.loss, LineLoss::default());
    }

    #[test]
    fn character_deduplication() {
        let built = build_with_history([
            (SceneHeading, "INT. ROOM"),
            (Character, "ALICE"),
            (Dialogue, "Hi."),
            (Character, "Alice"),
            (Dialogue, "Again."),
        ]);

        let screenplay = &built.screenplay;
        assert_eq!(screenplay.characters.len(), 1);
        assert_eq!(screenplay.characters[0].name, "ALICE");
        assert_eq!(screenplay.characters[0].dialogue.len(), 2);
        assert_eq!(built.speaker_history, vec!["ALICE", "ALICE"]);
    }

    #[test]
    fn characters_keep_first_seen_order() {
        let screenplay = build([
            (Character, "zed"),
            (Character, "amy"),
            (Character, "ZED"),
            (Character, "bo"),
        ]);
        assert_eq!(screenplay.character_names(), vec!["ZED", "AMY", "BO"]);
    }

    #[test]
    fn speaker_survives_scene_heading() {
        let screenplay = build([
            (SceneHeading, "INT. ROOM"),
            (Character, "BOB"),
            (SceneHeading, "EXT. STREET"),
            (Dialogue, "Still me."),
        ]);

        assert!(screenplay.scenes[0].dialogues.is_empty());
        assert_eq!(screenplay.scenes[1].dialogues[0].character, "BOB");
        assert_eq!(screenplay.scenes[1].dialogues[0].line.line_number, 4);
    }

    #[test]
    fn parenthetical_is_stored_bare_and_not_linked() {
        let screenplay = build([
            (SceneHeading, "int. room"),
            (Character, "bob"),
            (Parenthetical, "(quietly)"),
            (Dialogue, "hi."),
        ]);

        let scene = &screenplay.scenes[0];
        assert_eq!(scene.heading_text(), Some("INT. ROOM"));
        assert_eq!(
            scene.parentheticals,
            vec![ParentheticalEntry {
                character: "BOB".to_string(),
                line: LineEntry::new(3, "quietly"),
            }]
        );
        assert_eq!(scene.dialogues[0].line, LineEntry::new(4, "Hi."));
        assert_eq!(screenplay.characters[0].dialogue, vec![LineEntry::new(4, "Hi.")]);
    }

    #[test]
    fn entries_land_in_matching_lists() {
        let screenplay = build([
            (SceneHeading, "INT. ROOM"),
            (Action, "a"),
            (Note, "n"),
            (Shot, "s"),
        ]);

        let scene = &screenplay.scenes[0];
        assert_eq!(scene.screen_actions, vec![LineEntry::new(2, "A")]);
        assert_eq!(scene.notes, vec![LineEntry::new(3, "N")]);
        assert_eq!(scene.shots, vec![LineEntry::new(4, "S")]);
    }

    #[test]
    fn empty_input_builds_empty_screenplay() {
        let lines: Vec<(ElementType, &str)> = Vec::new();
        let built = build_with_history(lines);
        assert!(built.screenplay.is_empty());
        assert!(built.speaker_history.is_empty());
    }
}
