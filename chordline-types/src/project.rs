use serde::{Deserialize, Serialize};

use crate::ChordBlock;

pub const PROJECT_VERSION: &str = "1.0";
pub const DEFAULT_BPM: u16 = 100;
pub const DEFAULT_KEY: &str = "C";

/// On-disk project: tempo, key and the full block list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub version: String,
    pub bpm: u16,
    pub key: String,
    pub blocks: Vec<ChordBlock>,
}

impl Default for ProjectFile {
    fn default() -> Self {
        Self {
            version: PROJECT_VERSION.to_string(),
            bpm: DEFAULT_BPM,
            key: DEFAULT_KEY.to_string(),
            blocks: Vec::new(),
        }
    }
}
