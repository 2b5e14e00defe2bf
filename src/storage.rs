/// Best-score persistence and the about-screen description text.
///
/// Neither ever stops the game: a missing or broken file falls back to a
/// default and the problem is logged.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StorageError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(default)]
    best_score: u32,
}

/// `{"best_score": N}` on disk.
#[derive(Clone, Debug)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<u32, StorageError> {
        let text = fs::read_to_string(&self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        let file: ScoreFile = serde_json::from_str(&text).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(file.best_score)
    }

    /// Best score on disk, or 0 when the file is missing or unreadable.
    pub fn load(&self) -> u32 {
        match self.try_load() {
            Ok(best) => best,
            Err(err) if err.is_not_found() => {
                debug!(path = %self.path.display(), "no score file yet");
                0
            }
            Err(err) => {
                warn!("{err}; starting from 0");
                0
            }
        }
    }

    pub fn save(&self, best_score: u32) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&ScoreFile { best_score }).map_err(|source| {
            StorageError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(best_score, path = %self.path.display(), "best score saved");
        Ok(())
    }
}

// ── About text ────────────────────────────────────────────────────────────────

pub const MISSING_DESCRIPTION: [&str; 4] = [
    "SPACE SHOOTER",
    "",
    "Description file not found.",
    "Put info.txt next to the game.",
];

pub const UNREADABLE_DESCRIPTION: &str = "Could not read the game description.";

/// Lines shown on the about screen, verbatim.
pub fn load_description(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(text) => text.lines().map(str::to_owned).collect(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "description file missing");
            MISSING_DESCRIPTION.iter().map(|line| line.to_string()).collect()
        }
        Err(err) => {
            warn!(path = %path.display(), "failed to read description: {err}");
            vec![UNREADABLE_DESCRIPTION.to_string()]
        }
    }
}
