//! JSON storage for scripts
//!
//! Each script lives in `.screenplay/scripts/{id}.json` as pretty-printed
//! JSON. Reads take a shared lock; writes go to a locked temp file that is
//! atomically renamed over the target.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use thiserror::Error;

use crate::domain::{Script, ScriptId};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Script not found: {0}")]
    NotFound(String),

    #[error("'{}' matches more than one script: {}", .0, .1.join(", "))]
    Ambiguous(String, Vec<String>),
}

/// Store for script records
pub struct ScriptStore {
    dir: PathBuf,
}

impl ScriptStore {
    /// Creates a new script store at the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".screenplay").join("scripts"))
    }

    /// Returns the directory containing script files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to a script file
    pub fn script_path(&self, id: &ScriptId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Reads a single script
    pub fn read(&self, id: &ScriptId) -> Result<Script> {
        let path = self.script_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()).into());
        }

        let file = File::open(&path)
            .with_context(|| format!("Failed to open script: {}", path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on script")?;

        let script: Script = serde_json::from_reader(BufReader::new(&file))
            .with_context(|| format!("Failed to parse script: {}", path.display()))?;

        // Lock is released when file is dropped
        Ok(script)
    }

    /// Reads all scripts, sorted by name then ID
    pub fn read_all(&self) -> Result<Vec<Script>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read scripts directory: {}", self.dir.display()))?;

        let mut scripts = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<ScriptId>().ok())
            else {
                continue;
            };

            scripts.push(self.read(&id)?);
        }

        scripts.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(scripts)
    }

    /// Writes a script (full rewrite)
    pub fn write(&self, script: &Script) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let path = self.script_path(&script.id);
        let temp_path = path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on script")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, script)
                .context("Failed to serialize script")?;
            writeln!(writer).context("Failed to write script")?;
            writer.flush().context("Failed to flush script")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    /// Deletes a script file
    pub fn delete(&self, id: &ScriptId) -> Result<()> {
        let path = self.script_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()).into());
        }

        fs::remove_file(&path)
            .with_context(|| format!("Failed to delete script: {}", path.display()))
    }

    /// Finds a script by full ID, unique ID prefix, or exact name
    ///
    /// Name matching ignores case.
    pub fn resolve(&self, query: &str) -> Result<Script> {
        let query = query.trim();

        if let Ok(id) = query.parse::<ScriptId>() {
            return self.read(&id);
        }

        let scripts = self.read_all()?;

        // "s-" alone would match every script
        let by_prefix: Vec<&Script> = if query.len() > 2 {
            scripts
                .iter()
                .filter(|s| s.id.to_string().starts_with(query))
                .collect()
        } else {
            Vec::new()
        };
        let by_name: Vec<&Script> = scripts
            .iter()
            .filter(|s| s.name.eq_ignore_ascii_case(query))
            .collect();

        let matches = if by_prefix.is_empty() { by_name } else { by_prefix };

        match matches.as_slice() {
            [] => Err(StoreError::NotFound(query.to_string()).into()),
            [script] => Ok((*script).clone()),
            many => Err(StoreError::Ambiguous(
                query.to_string(),
                many.iter().map(|s| s.id.to_string()).collect(),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build, ElementType};
    use tempfile::TempDir;

    fn store() -> (TempDir, ScriptStore) {
        let dir = TempDir::new().unwrap();
        let store = ScriptStore::for_project(dir.path());
        (dir, store)
    }

    #[test]
    fn write_then_read() {
        let (_dir, store) = store();
        let mut script = Script::new("Pilot");
        script.set_screenplay(build([
            (ElementType::SceneHeading, "INT. ROOM"),
            (ElementType::Character, "BOB"),
            (ElementType::Dialogue, "Hi."),
        ]));

        store.write(&script).unwrap();
        let loaded = store.read(&script.id).unwrap();
        assert_eq!(loaded, script);
        assert!(!store.script_path(&script.id).with_extension("json.tmp").exists());
    }

    #[test]
    fn persisted_form_uses_model_field_names() {
        let (_dir, store) = store();
        let mut script = Script::new("Pilot");
        script.set_screenplay(build([(ElementType::Action, "Go.")]));
        store.write(&script).unwrap();

        let raw = fs::read_to_string(store.script_path(&script.id)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let scene = &value["screenplay"]["scenes"][0];
        assert!(scene["heading"].is_null());
        assert_eq!(scene["screen_actions"][0]["line_number"], 1);
        assert_eq!(scene["screen_actions"][0]["text"], "Go.");
    }

    #[test]
    fn read_all_sorted_by_name() {
        let (_dir, store) = store();
        store.write(&Script::new("Zebra")).unwrap();
        store.write(&Script::new("Alpha")).unwrap();

        let names: Vec<String> = store.read_all().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Alpha", "Zebra"]);
    }

    #[test]
    fn read_all_on_missing_dir_is_empty() {
        let (_dir, store) = store();
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn resolve_by_id_prefix_and_name() {
        let (_dir, store) = store();
        let script = Script::new("Pilot");
        store.write(&script).unwrap();

        let id = script.id.to_string();
        assert_eq!(store.resolve(&id).unwrap().id, script.id);
        assert_eq!(store.resolve(&id[..5]).unwrap().id, script.id);
        assert_eq!(store.resolve("pilot").unwrap().id, script.id);
        assert!(store.resolve("Finale").is_err());
    }

    #[test]
    fn resolve_ambiguous_name() {
        let (_dir, store) = store();
        let first = Script::new("Pilot");
        let mut second = Script::new("Pilot");
        second.id = ScriptId::new("Pilot (copy)", second.created_at);
        store.write(&first).unwrap();
        store.write(&second).unwrap();

        let err = store.resolve("Pilot").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Ambiguous(_, ids)) if ids.len() == 2
        ));
    }

    #[test]
    fn ambiguous_error_lists_ids() {
        let err = StoreError::Ambiguous(
            "Pilot".to_string(),
            vec!["s-1111111".to_string(), "s-2222222".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "'Pilot' matches more than one script: s-1111111, s-2222222"
        );
    }

    #[test]
    fn delete_removes_file() {
        let (_dir, store) = store();
        let script = Script::new("Pilot");
        store.write(&script).unwrap();

        store.delete(&script.id).unwrap();
        assert!(store.read(&script.id).is_err());
        assert!(store.delete(&script.id).is_err());
    }
}
