//! Autocomplete for scene headings and character names
//!
//! Candidates come from the current [`Screenplay`] and the speaker history of
//! the last build. Only scene-heading and character lines get suggestions.

use super::element::{normalize, wrap_parenthetical, ElementType};
use super::screenplay::Screenplay;

/// Ranks completion candidates for the active line
///
/// - Scene headings: distinct non-empty headings containing `input`
///   (case-insensitive), first-seen order.
/// - Characters: names filtered the same way, with the speaker before the
///   current one prepended when missing, so two-hander exchanges complete to
///   the other party first.
/// - Any other type: no candidates.
pub fn suggest(
    element: ElementType,
    input: &str,
    screenplay: &Screenplay,
    speaker_history: &[String],
) -> Vec<String> {
    match element {
        ElementType::SceneHeading => filter_matching(screenplay.scene_headings(), input),
        ElementType::Character => {
            let names = screenplay
                .character_names()
                .into_iter()
                .filter(|name| !name.is_empty());
            let mut candidates = filter_matching(names, input);

            if let Some(prior) = prior_speaker(speaker_history) {
                if !candidates.iter().any(|c| c == prior) {
                    candidates.insert(0, prior.to_string());
                }
            }

            candidates
        }
        _ => Vec::new(),
    }
}

/// The speaker before the currently active one
pub fn prior_speaker(speaker_history: &[String]) -> Option<&str> {
    speaker_history
        .len()
        .checked_sub(2)
        .map(|idx| speaker_history[idx].as_str())
        .filter(|name| !name.is_empty())
}

fn filter_matching<'a>(candidates: impl IntoIterator<Item = &'a str>, input: &str) -> Vec<String> {
    let needle = input.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| c.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect()
}

/// Suggestion list shown for the active line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    candidates: Vec<String>,
}

impl Suggestions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes candidates for the active line
    ///
    /// Types without suggestions clear the list immediately.
    pub fn refresh(
        &mut self,
        element: ElementType,
        input: &str,
        screenplay: &Screenplay,
        speaker_history: &[String],
    ) {
        self.candidates = suggest(element, input, screenplay, speaker_history);
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    /// Returns true when there is something to show
    pub fn is_visible(&self) -> bool {
        !self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn top(&self) -> Option<&str> {
        self.candidates.first().map(String::as_str)
    }

    /// Takes the top candidate as the new text for a line of `element`
    ///
    /// The candidate is normalized for the line's type; for parentheticals it
    /// is wrapped in parens since candidates are raw text. Clears the list.
    pub fn accept(&mut self, element: ElementType) -> Option<String> {
        let top = self.top()?.to_string();
        self.clear();

        Some(match element {
            ElementType::Parenthetical => wrap_parenthetical(&top),
            _ => normalize(element, &top),
        })
    }
}
