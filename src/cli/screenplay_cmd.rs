//! Content commands (import, lines, export, suggest, next)

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::{self, next_type, DraftLine, EditSession, ElementType};
use crate::storage::{draft, Project};

/// Replace a script's content with a parsed draft file
pub fn import(output: &Output, file: &Path, script: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;
    let mut script = project.resolve_script(script)?;

    let parsed = draft::read(file)?;
    for skipped in &parsed.skipped {
        output.warn(&format!("{}: skipped {}", file.display(), skipped));
    }

    let built =
        domain::build_with_history(parsed.lines.iter().map(|l| (l.element, l.text.as_str())));
    let screenplay = built.screenplay;
    let loss = built.loss;

    if loss.speech_without_speaker > 0 {
        output.warn(&format!(
            "{} dialogue/parenthetical line(s) had no speaker and were dropped",
            loss.speech_without_speaker
        ));
    }
    if loss.cues_without_speech > 0 {
        output.warn(&format!(
            "{} character line(s) had no dialogue and were dropped",
            loss.cues_without_speech
        ));
    }

    output.verbose_ctx(
        "import",
        &format!(
            "Built {} scenes, {} characters from {} lines",
            screenplay.scenes.len(),
            screenplay.characters.len(),
            parsed.lines.len()
        ),
    );

    let scenes = screenplay.scenes.len();
    let characters = screenplay.characters.len();
    script.set_screenplay(screenplay);
    project.script_store().write(&script)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": script.id.to_string(),
            "lines": parsed.lines.len(),
            "scenes": scenes,
            "characters": characters,
            "skipped": parsed.skipped,
            "dropped": {
                "speech_without_speaker": loss.speech_without_speaker,
                "cues_without_speech": loss.cues_without_speech,
            },
        }));
    } else {
        output.success(&format!(
            "Imported {} lines into {} ({}): {} scenes, {} characters",
            parsed.lines.len(),
            script.id,
            script.name,
            scenes,
            characters
        ));
    }

    Ok(())
}

/// Print a script as ordered, typed lines
pub fn lines(output: &Output, script: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;
    let script = project.resolve_script(script)?;
    let lines = domain::flatten(&script.screenplay)
        .with_context(|| format!("Script {} has corrupt line numbering", script.id))?;

    output.verbose_ctx("lines", &format!("Flattened {} lines", lines.len()));

    if output.is_json() {
        output.data(&lines);
    } else {
        print!("{}", draft::render(&lines));
    }

    Ok(())
}

/// Export a script as formatted plain text
pub fn export(output: &Output, script: Option<&str>, path: Option<&Path>) -> Result<()> {
    let project = Project::open_current()?;
    let script = project.resolve_script(script)?;
    let text = domain::export(&script.screenplay)
        .with_context(|| format!("Script {} has corrupt line numbering", script.id))?;

    match path {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            output.success(&format!("Exported {} to {}", script.id, path.display()));
        }
        None if output.is_json() => output.data(&serde_json::json!({
            "id": script.id.to_string(),
            "text": text,
        })),
        None => print!("{}", text),
    }

    Ok(())
}

/// Suggest completions as if `text` were typed on a new line of `element`
/// at the end of the script
pub fn suggest(
    output: &Output,
    element: ElementType,
    text: &str,
    script: Option<&str>,
) -> Result<()> {
    let project = Project::open_current()?;
    let script = project.resolve_script(script)?;

    let mut lines: Vec<DraftLine> = domain::flatten(&script.screenplay)
        .with_context(|| format!("Script {} has corrupt line numbering", script.id))?
        .into_iter()
        .map(|line| DraftLine::new(line.element, line.display_text()))
        .collect();
    lines.push(DraftLine::new(element, text));

    let session = EditSession::from_lines(lines);
    let candidates = session.suggestions().candidates();
    output.verbose_ctx(
        "suggest",
        &format!("Speaker history: {:?}", session.speaker_history()),
    );

    if output.is_json() {
        output.data(&candidates);
    } else {
        for candidate in candidates {
            println!("{}", candidate);
        }
    }

    Ok(())
}

/// Print the type that follows a line break after `element`
pub fn next(output: &Output, element: Option<ElementType>) {
    let next = next_type(element);

    if output.is_json() {
        output.data(&serde_json::json!({
            "current": element,
            "next": next,
        }));
    } else {
        println!("{}", next);
    }
}
