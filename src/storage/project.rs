//! Project management
//!
//! Handles project initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, ScriptStore};
use crate::domain::Script;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a screenplay project. Run 'reel init' first.")]
    NotInProject,

    #[error("No script selected. Pass --script or run 'reel script select <id>'.")]
    NoActiveScript,
}

/// A screenplay project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let project_dir = root.join(".screenplay");

        if !project_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Safe to run on an existing project; nothing is overwritten.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let project_dir = root.join(".screenplay");

        let scripts_dir = project_dir.join("scripts");
        fs::create_dir_all(&scripts_dir).with_context(|| {
            format!(
                "Failed to create scripts directory: {}",
                scripts_dir.display()
            )
        })?;

        // Create default config
        let config_path = project_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Reel configuration

# Script opened when --script is not given (set with 'reel script select')
# active_script = "s-1234567"

[suggestions]
enabled = true
max_visible = 5

[editor]
tick_rate_ms = 250
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = project_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = "# Interrupted writes\nscripts/*.tmp\n";
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .screenplay directory path
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(".screenplay")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the script store
    pub fn script_store(&self) -> ScriptStore {
        ScriptStore::for_project(&self.root)
    }

    /// Makes a script the default for commands without `--script`
    pub fn select(&mut self, script: &Script) -> Result<()> {
        self.config.project.active_script = Some(script.id.to_string());
        self.config.save_project()
    }

    /// Clears the selection if it points at the given script
    pub fn deselect(&mut self, script: &Script) -> Result<()> {
        if self.config.project.active_script.as_deref() == Some(script.id.to_string().as_str()) {
            self.config.project.active_script = None;
            self.config.save_project()?;
        }
        Ok(())
    }

    /// Resolves the script a command should act on
    ///
    /// An explicit query wins; otherwise the selected script; otherwise the
    /// only script in the project, if there is exactly one.
    pub fn resolve_script(&self, query: Option<&str>) -> Result<Script> {
        let store = self.script_store();

        if let Some(query) = query {
            return store.resolve(query);
        }

        if let Some(active) = &self.config.project.active_script {
            return store.resolve(active);
        }

        let mut scripts = store.read_all()?;
        if scripts.len() == 1 {
            return Ok(scripts.remove(0));
        }

        Err(ProjectError::NoActiveScript.into())
    }
}
