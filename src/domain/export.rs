//! Plain-text export
//!
//! Renders a flattened screenplay as UTF-8 text. Spacing follows the line
//! type:
//!
//! | Type | Blank line before | Text | Ends with |
//! |------|-------------------|------|-----------|
//! | scene-heading, character, shot | yes | uppercase | `\n` |
//! | action, note | yes | as stored | `\n` |
//! | parenthetical | no | wrapped in `( )` | `\n` |
//! | dialogue | no | as stored | `\n` |
//! | transition | yes | uppercase | `\n\n` |
//!
//! No blank line is written before the first line.

use super::element::{wrap_parenthetical, ElementType};
use super::flatten::{flatten, FlatLine, StructureError};
use super::screenplay::Screenplay;

/// Renders a screenplay to plain text
pub fn export(screenplay: &Screenplay) -> Result<String, StructureError> {
    Ok(export_lines(&flatten(screenplay)?))
}

/// Renders an already flattened line sequence to plain text
pub fn export_lines(lines: &[FlatLine]) -> String {
    let mut out = String::new();
    let mut preceded_by_something = false;

    for line in lines {
        if preceded_by_something && blank_line_before(line.element) {
            out.push('\n');
        }

        match line.element {
            ElementType::Parenthetical => out.push_str(&wrap_parenthetical(&line.text)),
            element if element.is_uppercase() => out.push_str(&line.text.to_uppercase()),
            _ => out.push_str(&line.text),
        }

        out.push('\n');
        if line.element == ElementType::Transition {
            out.push('\n');
        }

        preceded_by_something = true;
    }

    out
}

fn blank_line_before(element: ElementType) -> bool {
    !element.is_speech()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::build;
    use crate::domain::screenplay::{LineEntry, Scene};
    use ElementType::*;

    #[test]
    fn heading_then_action() {
        let screenplay = build([(SceneHeading, "INT. ROOM"), (Action, "He sits.")]);
        assert_eq!(export(&screenplay).unwrap(), "INT. ROOM\n\nHe sits.\n");
    }

    #[test]
    fn empty_screenplay_exports_empty_string() {
        assert_eq!(export(&Screenplay::new()).unwrap(), "");
    }

    #[test]
    fn speech_block_is_tight() {
        let screenplay = build([
            (SceneHeading, "int. room"),
            (Character, "bob"),
            (Parenthetical, "(quietly)"),
            (Dialogue, "hello."),
            (Dialogue, "anyone?"),
            (Action, "silence."),
        ]);

        assert_eq!(
            export(&screenplay).unwrap(),
            "INT. ROOM\n\nBOB\n(quietly)\nHello.\nAnyone?\n\nSilence.\n"
        );
    }

    #[test]
    fn transition_gets_trailing_blank_line() {
        let screenplay = build([
            (Action, "He leaves."),
            (Transition, "cut to:"),
            (SceneHeading, "ext. street"),
        ]);

        assert_eq!(
            export(&screenplay).unwrap(),
            "He leaves.\n\nCUT TO:\n\n\nEXT. STREET\n"
        );
    }

    #[test]
    fn first_line_has_no_leading_blank() {
        let lines = vec![
            FlatLine::new(1, Shot, "close on hands"),
            FlatLine::new(2, Note, "Maybe cut"),
        ];
        assert_eq!(export_lines(&lines), "CLOSE ON HANDS\n\nMaybe cut\n");
    }

    #[test]
    fn leading_dialogue_has_no_blank() {
        let lines = vec![FlatLine::new(1, Dialogue, "Hi."), FlatLine::new(2, Dialogue, "Bye.")];
        assert_eq!(export_lines(&lines), "Hi.\nBye.\n");
    }

    #[test]
    fn invalid_numbering_is_reported() {
        let mut scene = Scene::with_heading(LineEntry::new(1, "INT. ROOM"));
        scene.notes.push(LineEntry::new(1, "Dup"));
        let screenplay = Screenplay {
            scenes: vec![scene],
            characters: vec![],
        };

        assert!(export(&screenplay).is_err());
    }
}
