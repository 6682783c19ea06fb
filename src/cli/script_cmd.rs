//! Script CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::Script;
use crate::storage::Project;

#[derive(Subcommand)]
pub enum ScriptCommands {
    /// Create a new, empty script
    New {
        /// Script name (may be empty)
        #[arg(default_value = "")]
        name: String,

        /// Also make it the selected script
        #[arg(long)]
        select: bool,
    },

    /// List all scripts
    List,

    /// Show a script summary
    Show {
        /// Script ID or name (defaults to the selected script)
        id: Option<String>,
    },

    /// Rename a script
    Rename {
        /// Script ID or name
        id: String,

        /// New name
        name: String,
    },

    /// Select the script used when --script is not given
    Select {
        /// Script ID or name
        id: String,
    },

    /// Delete a script
    Delete {
        /// Script ID or name
        id: String,
    },
}

pub fn run(cmd: ScriptCommands, output: &Output) -> Result<()> {
    match cmd {
        ScriptCommands::New { name, select } => new_script(output, &name, select),
        ScriptCommands::List => list_scripts(output),
        ScriptCommands::Show { id } => show_script(output, id.as_deref()),
        ScriptCommands::Rename { id, name } => rename_script(output, &id, &name),
        ScriptCommands::Select { id } => select_script(output, &id),
        ScriptCommands::Delete { id } => delete_script(output, &id),
    }
}

fn new_script(output: &Output, name: &str, select: bool) -> Result<()> {
    let mut project = Project::open_current()?;
    let script = Script::new(name);
    project.script_store().write(&script)?;
    let path = project.script_store().script_path(&script.id);
    output.verbose_ctx("script", &format!("Wrote {}", path.display()));

    if select {
        project.select(&script)?;
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": script.id.to_string(),
            "name": script.name,
            "selected": select,
        }));
    } else {
        output.success(&format!("Created script: {} ({})", script.id, script.name));
    }

    Ok(())
}

fn list_scripts(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let scripts = project.script_store().read_all()?;
    let active = project.config().project.active_script.clone();
    output.verbose_ctx("script", &format!("Found {} scripts", scripts.len()));

    let is_active = |script: &Script| active.as_deref() == Some(script.id.to_string().as_str());

    if output.is_json() {
        let items: Vec<_> = scripts
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id.to_string(),
                    "name": s.name,
                    "selected": is_active(s),
                    "scenes": s.screenplay.scenes.len(),
                    "updated_at": s.updated_at,
                })
            })
            .collect();
        output.data(&items);
    } else if scripts.is_empty() {
        println!("No scripts found.");
    } else {
        println!("  {:<12} {:<8} NAME", "ID", "SCENES");
        println!("{}", "-".repeat(50));
        for script in &scripts {
            let marker = if is_active(script) { "*" } else { " " };
            println!(
                "{} {:<12} {:<8} {}",
                marker,
                script.id,
                script.screenplay.scenes.len(),
                script.name
            );
        }
    }

    Ok(())
}

fn show_script(output: &Output, id: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;
    let script = project.resolve_script(id)?;
    let screenplay = &script.screenplay;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": script.id.to_string(),
            "name": script.name,
            "created_at": script.created_at,
            "updated_at": script.updated_at,
            "scenes": screenplay.scenes.len(),
            "characters": screenplay.character_names(),
            "lines": screenplay.line_count(),
        }));
        return Ok(());
    }

    println!("{} {}", script.id, script.name);
    println!("Updated:    {}", script.updated_at.format("%Y-%m-%d %H:%M"));
    println!("Scenes:     {}", screenplay.scenes.len());
    println!("Lines:      {}", screenplay.line_count());

    if !screenplay.characters.is_empty() {
        println!();
        println!("Characters:");
        for character in &screenplay.characters {
            println!("  {:<20} {} lines", character.name, character.dialogue.len());
        }
    }

    let headings = screenplay.scene_headings();
    if !headings.is_empty() {
        println!();
        println!("Scene headings:");
        for heading in headings {
            println!("  {}", heading);
        }
    }

    Ok(())
}

fn rename_script(output: &Output, id: &str, name: &str) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.script_store();
    let mut script = store.resolve(id)?;

    let old_name = script.name.clone();
    script.rename(name);
    store.write(&script)?;

    output.success(&format!("Renamed {}: {} -> {}", script.id, old_name, script.name));
    Ok(())
}

fn select_script(output: &Output, id: &str) -> Result<()> {
    let mut project = Project::open_current()?;
    let script = project.script_store().resolve(id)?;
    project.select(&script)?;

    output.success(&format!("Selected script: {} ({})", script.id, script.name));
    Ok(())
}

fn delete_script(output: &Output, id: &str) -> Result<()> {
    let mut project = Project::open_current()?;
    let store = project.script_store();
    let script = store.resolve(id)?;

    store.delete(&script.id)?;
    project.deselect(&script)?;

    output.success(&format!("Deleted script: {} ({})", script.id, script.name));
    Ok(())
}
