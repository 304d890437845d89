//! # Replay Scripts
//!
//! A script is an ordered list of recorded `Action`s, stored as TOML
//! (`[[actions]]` tables) or JSON (`{"actions": [...]}`). Replaying one
//! against a store reproduces the exact event sequence of a session.
//!
//! Reports are written with atomic rename (write `.tmp`, then `rename()`).

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::action::{Action, run};
use crate::core::event::Event;
use crate::core::state::Versions;
use crate::core::store::Dispatch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReplayScript {
    pub actions: Vec<Action>,
}

#[derive(Debug)]
pub enum ScriptError {
    Io(io::Error),
    Json(serde_json::Error),
    Toml(toml::de::Error),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io(e) => write!(f, "script I/O error: {e}"),
            ScriptError::Json(e) => write!(f, "script JSON error: {e}"),
            ScriptError::Toml(e) => write!(f, "script TOML error: {e}"),
        }
    }
}

impl std::error::Error for ScriptError {}

pub fn parse_toml_script(contents: &str) -> Result<ReplayScript, ScriptError> {
    toml::from_str(contents).map_err(ScriptError::Toml)
}

pub fn parse_json_script(contents: &str) -> Result<ReplayScript, ScriptError> {
    serde_json::from_str(contents).map_err(ScriptError::Json)
}

/// Read a script, choosing the format from the file extension (`.toml`, else JSON).
pub fn read_script(path: &Path) -> Result<ReplayScript, ScriptError> {
    let contents = fs::read_to_string(path).map_err(ScriptError::Io)?;
    let script = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_toml_script(&contents)?,
        _ => parse_json_script(&contents)?,
    };
    info!("Read {} actions from {}", script.actions.len(), path.display());
    Ok(script)
}

/// JSON Schema of the script format.
pub fn script_schema() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&schemars::schema_for!(ReplayScript))
}

/// An action that could not run. Replay continues past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFailure {
    pub index: usize,
    pub action: Action,
    pub error: String,
}

/// Run every action in order, collecting the ones that fail.
pub fn replay(store: &mut impl Dispatch, actions: Vec<Action>) -> Vec<ReplayFailure> {
    let mut failures = Vec::new();
    for (index, action) in actions.into_iter().enumerate() {
        debug!("Replaying action {index}: {action:?}");
        if let Err(e) = run(store, action.clone()) {
            warn!("Action {index} failed: {e}");
            failures.push(ReplayFailure {
                index,
                action,
                error: e.to_string(),
            });
        }
    }
    failures
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub recorded_at: DateTime<Utc>,
    pub dataset: String,
    pub actions: usize,
    pub failures: Vec<ReplayFailure>,
    pub events: Vec<Event>,
    pub versions: Versions,
}

impl ReplayReport {
    /// Event counts by catalog name.
    pub fn event_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Human-readable summary for the terminal.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("dataset:  {}", self.dataset),
            format!(
                "actions:  {} ({} failed)",
                self.actions,
                self.failures.len()
            ),
            format!("events:   {}", self.events.len()),
        ];
        for (kind, count) in self.event_counts() {
            lines.push(format!("  {kind:<40} {count}"));
        }
        for failure in &self.failures {
            lines.push(format!("failed #{}: {}", failure.index, failure.error));
        }
        lines.push(format!(
            "versions: visibility={} branchThickness={} tipRadii={}",
            self.versions.visibility, self.versions.branch_thickness, self.versions.tip_radii
        ));
        lines.join("\n")
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
pub fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
