use crate::types::config::EngineConfig;
use crate::types::error::{EditorError, EditorResult};
use crate::types::session::EditorSession;
use crate::types::timeline::Timeline;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const PROJECT_VERSION: u32 = 1;

/// A saved timeline. History and selection are session state and are not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub timeline: Timeline,
}

impl Project {
    pub fn new(name: impl Into<String>, timeline: Timeline) -> Self {
        Project {
            version: PROJECT_VERSION,
            name: name.into(),
            timeline,
        }
    }

    pub fn from_session(name: impl Into<String>, session: &EditorSession) -> Self {
        Self::new(name, session.timeline().clone())
    }

    /// Open an editing session on this project's timeline, with empty history.
    pub fn into_session(self, config: EngineConfig) -> EditorSession {
        EditorSession::with_timeline(self.timeline, config)
    }

    /// Save the project to a JSON file at the given path.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> EditorResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path.as_ref())?;
        file.write_all(json.as_bytes())?;
        tracing::debug!(path = %path.as_ref().display(), name = %self.name, "Project saved");
        Ok(())
    }

    /// Load a project from a JSON file at the given path.
    ///
    /// Invalid clip timing (negative or non-finite fields, trims that leave no
    /// media) is repaired, using `min_visible` for the trim clamp. Anything a
    /// session could have produced loads back unchanged.
    pub fn load_from_file(path: impl AsRef<Path>, min_visible: f64) -> EditorResult<Project> {
        let mut file = File::open(path.as_ref())?;
        let mut json = String::new();
        file.read_to_string(&mut json)?;
        let mut project: Project = serde_json::from_str(&json)?;
        if project.version != PROJECT_VERSION {
            return Err(EditorError::UnsupportedVersion {
                version: project.version,
            });
        }
        project.timeline.normalize(min_visible);
        tracing::debug!(
            path = %path.as_ref().display(),
            tracks = project.timeline.tracks.len(),
            "Project loaded"
        );
        Ok(project)
    }
}
