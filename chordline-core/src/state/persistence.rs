//! JSON project save/load.
//!
//! Loading is lenient about content: missing or mistyped fields fall back to
//! defaults and unusable blocks are skipped. Only an unreadable file or text
//! that is not a JSON object is an error.

use std::io::Write;
use std::path::Path;

use chordline_types::{ChordBlock, ProjectFile, DEFAULT_BLOCK_DURATION, DEFAULT_BPM, DEFAULT_KEY, PROJECT_VERSION};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("could not access project file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid project file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("project file is not a JSON object")]
    NotAnObject,
}

pub fn to_json(project: &ProjectFile) -> Result<String, ProjectError> {
    Ok(serde_json::to_string_pretty(project)?)
}

/// Write the project next to `path` and rename it into place.
pub fn save_project(path: &Path, project: &ProjectFile) -> Result<(), ProjectError> {
    let json = to_json(project)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist(path).map_err(|e| ProjectError::Io(e.error))?;
    log::info!(target: "project", "saved {} blocks to {}", project.blocks.len(), path.display());
    Ok(())
}

pub fn load_project(path: &Path) -> Result<ProjectFile, ProjectError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        log::warn!(target: "project", "could not read {}: {}", path.display(), e);
        e
    })?;
    parse_project(&text).map_err(|e| {
        log::warn!(target: "project", "could not load {}: {}", path.display(), e);
        e
    })
}

pub fn parse_project(text: &str) -> Result<ProjectFile, ProjectError> {
    let value: Value = serde_json::from_str(text)?;
    let obj = value.as_object().ok_or(ProjectError::NotAnObject)?;

    let version = obj
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(PROJECT_VERSION)
        .to_string();
    let bpm = obj
        .get("bpm")
        .and_then(Value::as_f64)
        .filter(|b| b.is_finite() && *b >= 1.0)
        .map(|b| b.round().min(f64::from(u16::MAX)) as u16)
        .unwrap_or(DEFAULT_BPM);
    let key = obj
        .get("key")
        .and_then(Value::as_str)
        .filter(|k| !k.is_empty())
        .unwrap_or(DEFAULT_KEY)
        .to_string();

    let blocks = match obj.get("blocks") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let block = parse_block(item);
                if block.is_none() {
                    log::warn!(target: "project", "skipping block {}: no chord token", i);
                }
                block
            })
            .collect(),
        Some(other) if !other.is_null() => {
            log::warn!(target: "project", "blocks is not an array, loading none");
            Vec::new()
        }
        _ => Vec::new(),
    };

    Ok(ProjectFile {
        version,
        bpm,
        key,
        blocks,
    })
}

fn parse_block(item: &Value) -> Option<ChordBlock> {
    let token = item
        .get("chord")
        .or_else(|| item.get("token"))
        .and_then(Value::as_str)?;
    let number = |field: &str| item.get(field).and_then(Value::as_f64);
    let track = number("track")
        .filter(|t| t.is_finite())
        .map(|t| t.max(0.0).round().min(f64::from(u32::MAX)) as u32)
        .unwrap_or(0);
    let mut block = ChordBlock::new(
        token,
        number("position").unwrap_or(0.0),
        number("duration").unwrap_or(DEFAULT_BLOCK_DURATION),
        track,
    );
    block.sanitize();
    Some(block)
}
