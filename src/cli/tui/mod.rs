//! Interactive screenplay editor
//!
//! A terminal writing surface built on ratatui. Every keystroke edits an
//! [`EditSession`](crate::domain::EditSession), which rebuilds the
//! screenplay and refreshes autocomplete candidates.

mod app;
mod event;
mod ui;
mod view;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::Output;
use app::App;
use event::EventHandler;

/// Launch the editor on a script
pub fn run(output: &Output, script: Option<&str>) -> Result<()> {
    output.verbose_ctx("tui", "Initializing editor");

    // Load before touching the terminal so errors print normally
    let mut app = App::new(script)?;
    output.verbose_ctx(
        "tui",
        &format!("Editing {} ({} lines)", app.script().id, app.session().lines().len()),
    );

    let mut terminal = ui::init_terminal()?;
    let event_handler = EventHandler::new(app.tick_rate_ms());

    // Run the main loop with panic safety
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        app.run(&mut terminal, event_handler)
    }));

    // Always restore terminal, even on panic
    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result
        }
        Err(panic_payload) => {
            let _ = restore_result;
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("Editor panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("Editor panicked: {}", s))
            } else {
                Err(anyhow!("Editor panicked with unknown error"))
            }
        }
    }
}
