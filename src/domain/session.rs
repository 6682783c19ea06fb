//! Editing session
//!
//! The session owns the typed line sequence the writer edits, which line is
//! active, and everything derived from the lines: the built screenplay, the
//! speaker history of that build and the suggestions for the active line.
//! Every edit rebuilds the screenplay from scratch; nothing derived is
//! patched in place.

use serde::{Deserialize, Serialize};

use super::builder::{build, build_with_history, BuiltScreenplay, LineLoss};
use super::element::{next_type, placeholder, strip_parenthetical, wrap_parenthetical, ElementType};
use super::export::export;
use super::flatten::{flatten, StructureError};
use super::screenplay::Screenplay;
use super::suggest::Suggestions;

/// A line as the writer sees it: type plus raw text
///
/// Parenthetical text includes its parens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    #[serde(rename = "type")]
    pub element: ElementType,
    pub text: String,
}

impl DraftLine {
    pub fn new(element: ElementType, text: impl Into<String>) -> Self {
        Self {
            element,
            text: text.into(),
        }
    }

    /// A fresh line of the given type
    pub fn empty(element: ElementType) -> Self {
        Self::new(element, placeholder(element))
    }
}

/// Editing context for one open script
#[derive(Debug, Clone)]
pub struct EditSession {
    lines: Vec<DraftLine>,
    active: usize,
    built: BuiltScreenplay,
    suggestions: Suggestions,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    /// Creates a session with a single empty action line
    pub fn new() -> Self {
        Self::from_lines(Vec::new())
    }

    /// Creates a session over the given lines; the last line is active
    pub fn from_lines(mut lines: Vec<DraftLine>) -> Self {
        if lines.is_empty() {
            lines.push(DraftLine::empty(ElementType::Action));
        }

        let mut session = Self {
            active: lines.len() - 1,
            lines,
            built: BuiltScreenplay::default(),
            suggestions: Suggestions::new(),
        };
        session.rebuild();
        session
    }

    /// Opens a stored screenplay for editing
    pub fn from_screenplay(screenplay: &Screenplay) -> Result<Self, StructureError> {
        let lines = flatten(screenplay)?
            .into_iter()
            .map(|line| DraftLine::new(line.element, line.display_text()))
            .collect();
        Ok(Self::from_lines(lines))
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_line(&self) -> &DraftLine {
        &self.lines[self.active]
    }

    pub fn screenplay(&self) -> &Screenplay {
        &self.built.screenplay
    }

    pub fn speaker_history(&self) -> &[String] {
        &self.built.speaker_history
    }

    /// Typed lines the current screenplay has no place for
    pub fn loss(&self) -> LineLoss {
        self.built.loss
    }

    pub fn suggestions(&self) -> &Suggestions {
        &self.suggestions
    }

    /// Renders the current screenplay as plain text
    pub fn export(&self) -> Result<String, StructureError> {
        export(&self.built.screenplay)
    }

    /// Replaces the active line's text
    pub fn set_active_text(&mut self, text: impl Into<String>) {
        self.lines[self.active].text = text.into();
        self.rebuild();
    }

    /// Types one character into the active line
    ///
    /// Inside a parenthetical the character goes before the closing paren.
    pub fn push_char(&mut self, c: char) {
        let line = &mut self.lines[self.active];
        if line.element == ElementType::Parenthetical && line.text.ends_with(')') {
            let at = line.text.len() - 1;
            line.text.insert(at, c);
        } else {
            line.text.push(c);
        }
        self.rebuild();
    }

    /// Deletes the last typed character of the active line
    pub fn pop_char(&mut self) {
        let line = &mut self.lines[self.active];
        if line.element == ElementType::Parenthetical && line.text.ends_with(')') {
            let inner = &line.text[..line.text.len() - 1];
            let last = inner.char_indices().last().map(|(idx, _)| idx).filter(|idx| *idx > 0);
            if let Some(idx) = last {
                line.text.remove(idx);
            }
        } else {
            line.text.pop();
        }
        self.rebuild();
    }

    /// Changes the active line's type, adding or removing parens as needed
    pub fn set_active_type(&mut self, element: ElementType) {
        let line = &mut self.lines[self.active];
        if line.element == element {
            return;
        }

        if element == ElementType::Parenthetical {
            line.text = wrap_parenthetical(strip_parenthetical(&line.text));
        } else if line.element == ElementType::Parenthetical {
            line.text = strip_parenthetical(&line.text).to_string();
        }
        line.element = element;
        self.rebuild();
    }

    pub fn cycle_active_type(&mut self) {
        let element = self.active_line().element.cycle_next();
        self.set_active_type(element);
    }

    /// Breaks after the active line
    ///
    /// The new line's type follows from the active line's type and it starts
    /// with that type's placeholder text. Returns the new line's type.
    pub fn insert_line_after_active(&mut self) -> ElementType {
        let element = next_type(Some(self.active_line().element));
        self.active += 1;
        self.lines.insert(self.active, DraftLine::empty(element));
        self.rebuild();
        element
    }

    /// Removes the active line, keeping at least one line
    pub fn remove_active_line(&mut self) -> bool {
        if self.lines.len() <= 1 {
            return false;
        }

        self.lines.remove(self.active);
        self.active = self.active.min(self.lines.len() - 1);
        self.rebuild();
        true
    }

    pub fn move_up(&mut self) {
        if self.active > 0 {
            self.active -= 1;
            self.refresh_suggestions();
        }
    }

    pub fn move_down(&mut self) {
        if self.active + 1 < self.lines.len() {
            self.active += 1;
            self.refresh_suggestions();
        }
    }

    /// Replaces the active line with the top suggestion
    ///
    /// Returns false if there was nothing to accept.
    pub fn accept_suggestion(&mut self) -> bool {
        let element = self.active_line().element;
        match self.suggestions.accept(element) {
            Some(text) => {
                self.lines[self.active].text = text;
                self.built = self.build();
                true
            }
            None => false,
        }
    }

    fn build(&self) -> BuiltScreenplay {
        build_with_history(self.lines.iter().map(|l| (l.element, l.text.as_str())))
    }

    fn rebuild(&mut self) {
        self.built = self.build();
        self.refresh_suggestions();
    }

    /// Candidates come from every line except the active one, so a
    /// half-typed name or heading never suggests itself. Speaker history
    /// stops at the active line; cues further down never count as prior.
    fn refresh_suggestions(&mut self) {
        let active = self.active;
        let line = &self.lines[active];
        match line.element {
            ElementType::SceneHeading | ElementType::Character => {
                let others = build(
                    self.lines
                        .iter()
                        .enumerate()
                        .filter(|(idx, _)| *idx != active)
                        .map(|(_, l)| (l.element, l.text.as_str())),
                );
                let history = build_with_history(
                    self.lines[..=active]
                        .iter()
                        .map(|l| (l.element, l.text.as_str())),
                )
                .speaker_history;
                self.suggestions
                    .refresh(line.element, &line.text, &others, &history);
            }
            _ => self.suggestions.clear(),
        }
    }
}
