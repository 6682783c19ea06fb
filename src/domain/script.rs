//! Script record
//!
//! A script is the durable project record: a name, timestamps and the
//! [`Screenplay`] built from the last edit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ScriptId;
use super::screenplay::Screenplay;

/// A named screenplay project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Unique identifier
    pub id: ScriptId,

    /// Human-readable name
    pub name: String,

    /// When the script was created
    pub created_at: DateTime<Utc>,

    /// When the script was last saved with new content or name
    pub updated_at: DateTime<Utc>,

    /// Structured content
    #[serde(default)]
    pub screenplay: Screenplay,
}

impl Script {
    /// Creates an empty script with the given name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        let id = ScriptId::new(&name, now);

        Self {
            id,
            name,
            created_at: now,
            updated_at: now,
            screenplay: Screenplay::new(),
        }
    }

    /// Renames the script
    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.name != name {
            self.name = name;
            self.updated_at = Utc::now();
        }
    }

    /// Replaces the content wholesale
    pub fn set_screenplay(&mut self, screenplay: Screenplay) {
        if self.screenplay != screenplay {
            self.screenplay = screenplay;
            self.updated_at = Utc::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::build;
    use crate::domain::element::ElementType;

    #[test]
    fn new_script_is_empty() {
        let script = Script::new("Pilot");
        assert_eq!(script.name, "Pilot");
        assert!(script.screenplay.is_empty());
        assert_eq!(script.created_at, script.updated_at);
    }

    #[test]
    fn rename_touches_timestamp_only_on_change() {
        let mut script = Script::new("Pilot");
        let before = script.updated_at;

        script.rename("Pilot");
        assert_eq!(script.updated_at, before);

        script.rename("Episode 1");
        assert_eq!(script.name, "Episode 1");
        assert!(script.updated_at >= before);
    }

    #[test]
    fn empty_name_is_allowed() {
        let script = Script::new("");
        assert_eq!(script.name, "");
    }

    #[test]
    fn serde_roundtrip() {
        let mut script = Script::new("Pilot");
        script.set_screenplay(build([(ElementType::SceneHeading, "INT. ROOM")]));

        let json = serde_json::to_string(&script).unwrap();
        let parsed: Script = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, script);
    }
}
