use crate::types::error::EditorResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Numeric tuning knobs for the editing engine.
///
/// Every field falls back to its default when missing from a config file,
/// so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum length of media that must stay visible after trimming (seconds).
    pub min_visible_duration: f64,
    /// Space left between a clip and its duplicate.
    pub duplicate_gap: f64,
    /// Gaps at or below this size are not reported.
    pub gap_threshold: f64,
    /// Effective length of a freeze-frame clip.
    pub freeze_duration: f64,
    /// Floor applied by `display_duration` for short or empty timelines.
    pub min_timeline_duration: f64,
    /// Cap on undo depth; `None` keeps every entry.
    pub max_history: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_visible_duration: 0.1,
            duplicate_gap: 0.1,
            gap_threshold: 0.1,
            freeze_duration: 1.0,
            min_timeline_duration: 10.0,
            max_history: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file at the given path.
    pub fn load_from_file(path: impl AsRef<Path>) -> EditorResult<Self> {
        let mut file = File::open(path.as_ref())?;
        let mut json = String::new();
        file.read_to_string(&mut json)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded engine config");
        Ok(config)
    }
}
