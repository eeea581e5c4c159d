/// Last-reading cache
///
/// Keeps the most recent successfully fetched reading on disk as JSON so a
/// restarted monitor has something better than the neutral reading to show
/// while the channel is unreachable.
///
/// Contract:
/// - `store` overwrites the previous reading; only one is ever kept.
/// - `load` returns `Ok(None)` when nothing has been cached yet.
/// - A corrupt cache file is an error; callers log it and carry on.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Reading;

pub struct ReadingCache {
    path: PathBuf,
}

impl ReadingCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self, reading: &Reading) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // Readers never see a partially written file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(reading)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn load(&self) -> Result<Option<Reading>, Box<dyn Error>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
