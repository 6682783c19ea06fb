//! Editor state and key handling

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;

use super::event::{Event, EventHandler};
use super::ui::Terminal;
use super::view;
use crate::domain::{placeholder, EditSession, Script};
use crate::storage::Project;

/// Application state
pub struct App {
    project: Project,

    /// Script being edited; its stored screenplay is replaced on save
    script: Script,

    session: EditSession,

    /// Edits since the last save
    dirty: bool,

    /// Set after a quit attempt with unsaved changes
    confirm_quit: bool,

    status_message: Option<String>,

    should_quit: bool,
}

impl App {
    /// Opens the current project's script for editing
    pub fn new(script: Option<&str>) -> Result<Self> {
        let project = Project::open_current()?;
        Self::with_project(project, script)
    }

    pub fn with_project(project: Project, script: Option<&str>) -> Result<Self> {
        let script = project.resolve_script(script)?;
        let session = EditSession::from_screenplay(&script.screenplay)
            .with_context(|| format!("Script {} has corrupt line numbering", script.id))?;

        Ok(Self {
            project,
            script,
            session,
            dirty: false,
            confirm_quit: false,
            status_message: Some("Ctrl-S save, Tab accept, Ctrl-T type, Esc quit".to_string()),
            should_quit: false,
        })
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key)?,
                Event::Resize | Event::Tick => {}
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        view::draw(frame, self);
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl {
            match key.code {
                KeyCode::Char('s') => self.save()?,
                KeyCode::Char('t') => self.edit(EditSession::cycle_active_type),
                KeyCode::Char('k') => {
                    if self.session.remove_active_line() {
                        self.mark_dirty();
                    }
                }
                KeyCode::Char('q') | KeyCode::Char('c') => self.request_quit(),
                _ => {}
            }
            return Ok(());
        }

        if key.code != KeyCode::Esc {
            self.confirm_quit = false;
        }

        match key.code {
            KeyCode::Esc => self.request_quit(),
            KeyCode::Enter => {
                let element = self.session.insert_line_after_active();
                self.status_message = Some(format!("New {} line", element));
                self.mark_dirty();
            }
            KeyCode::Tab => {
                if self.suggestions_enabled() && self.session.accept_suggestion() {
                    self.mark_dirty();
                }
            }
            KeyCode::BackTab => self.edit(EditSession::cycle_active_type),
            KeyCode::Up => self.session.move_up(),
            KeyCode::Down => self.session.move_down(),
            KeyCode::Backspace => {
                if self.active_is_blank() {
                    if self.session.remove_active_line() {
                        self.mark_dirty();
                    }
                } else {
                    self.edit(EditSession::pop_char);
                }
            }
            KeyCode::Char(c) => self.edit(|session| session.push_char(c)),
            _ => {}
        }

        Ok(())
    }

    /// Stores the current screenplay on the script
    pub fn save(&mut self) -> Result<()> {
        let loss = self.session.loss();

        self.script.set_screenplay(self.session.screenplay().clone());
        self.project.script_store().write(&self.script)?;
        self.dirty = false;

        self.status_message = Some(if loss.total() > 0 {
            format!(
                "Saved {}; not kept: {} speech line(s) without a speaker, {} cue(s) with no speech",
                self.script.id, loss.speech_without_speaker, loss.cues_without_speech
            )
        } else {
            format!("Saved {}", self.script.id)
        });

        Ok(())
    }

    fn edit(&mut self, f: impl FnOnce(&mut EditSession)) {
        f(&mut self.session);
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.confirm_quit = false;
    }

    fn request_quit(&mut self) {
        if !self.dirty || self.confirm_quit {
            self.should_quit = true;
        } else {
            self.confirm_quit = true;
            self.status_message =
                Some("Unsaved changes. Ctrl-S to save, Esc again to discard".to_string());
        }
    }

    /// True when the active line holds nothing but its placeholder
    fn active_is_blank(&self) -> bool {
        let line = self.session.active_line();
        line.text.is_empty() || line.text == placeholder(line.element)
    }

    fn suggestions_enabled(&self) -> bool {
        self.project.config().project.suggestions.enabled
    }

    // Accessors for views

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn tick_rate_ms(&self) -> u64 {
        self.project.config().project.editor.tick_rate_ms
    }

    /// Candidates to show, capped by config; empty when suggestions are off
    pub fn visible_suggestions(&self) -> &[String] {
        let config = &self.project.config().project.suggestions;
        if !config.enabled {
            return &[];
        }
        let candidates = self.session.suggestions().candidates();
        &candidates[..candidates.len().min(config.max_visible)]
    }

    #[cfg(test)]
    fn should_quit(&self) -> bool {
        self.should_quit
    }
}
