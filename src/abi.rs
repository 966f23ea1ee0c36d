use std::{fs, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::models::common::EventSignature;
use crate::models::errors::ConfigError;

/// One entry of a standard contract-ABI JSON array. Only the fields the
/// audit cares about are modeled; everything else is ignored.
#[derive(Debug, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type")]
    kind: String,
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<AbiInput>,
}

#[derive(Debug, Deserialize)]
struct AbiInput {
    #[serde(rename = "type")]
    ty: String,
}

/// Load the ABI document at `path` and extract its event declarations as
/// strongly typed signatures. Functions, constructors, errors etc. are
/// skipped. An event entry without a name is rejected here rather than
/// surfacing later as a topic that matches nothing.
pub fn load_event_signatures(path: &Path) -> Result<Vec<EventSignature>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document: serde_json::Value =
        serde_json::from_str(&contents).map_err(|source| ConfigError::FileParse {
            path: path.to_path_buf(),
            source,
        })?;
    if !document.is_array() {
        return Err(ConfigError::AbiNotArray);
    }

    let entries: Vec<AbiEntry> =
        serde_json::from_value(document).map_err(|source| ConfigError::FileParse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut events = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        if entry.kind != "event" {
            continue;
        }
        let name = entry
            .name
            .clone()
            .ok_or(ConfigError::EventMissingName { index })?;
        events.push(EventSignature {
            name,
            inputs: entry.inputs.iter().map(|i| i.ty.clone()).collect(),
        });
    }

    debug!("Loaded {} event definitions from {}", events.len(), path.display());
    Ok(events)
}

/// Load the optional required-events document: a JSON array of event
/// names. Callers pass `None` when the flag was not given.
pub fn load_required_events(path: Option<&Path>) -> Result<Vec<String>, ConfigError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document: serde_json::Value =
        serde_json::from_str(&contents).map_err(|source| ConfigError::FileParse {
            path: path.to_path_buf(),
            source,
        })?;

    match serde_json::from_value::<Vec<String>>(document) {
        Ok(names) => Ok(names),
        Err(_) => Err(ConfigError::RequiredEventsNotStrings),
    }
}
