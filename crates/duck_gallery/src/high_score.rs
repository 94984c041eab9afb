//! High-score persistence
//!
//! The round state loads the high score once at startup and saves it every
//! time it is beaten. Storage sits behind [`HighScoreStore`] so headless runs
//! and tests can keep it in memory.

use gallery_engine::config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// High-score storage errors
#[derive(Error, Debug)]
pub enum HighScoreError {
    /// Reading or writing the record failed
    #[error("high score file error: {0}")]
    Config(#[from] ConfigError),

    /// The store refuses writes
    #[error("high score store unavailable: {0}")]
    Unavailable(String),
}

/// Where the high score lives between runs
pub trait HighScoreStore {
    /// Read the persisted high score; a store that has never been written
    /// reports 0
    fn load(&self) -> Result<u32, HighScoreError>;

    /// Persist a new high score
    fn save(&mut self, high_score: u32) -> Result<(), HighScoreError>;
}

/// On-disk record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScoreRecord {
    /// Best score so far
    pub high_score: u32,
    /// Unix time of the last update, in seconds
    pub last_updated: u64,
}

impl Config for HighScoreRecord {}

/// High score kept in a TOML or RON file
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    /// Store backed by `path`; the extension picks the format
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<u32, HighScoreError> {
        if !self.path.exists() {
            log::debug!("No high score at {}, starting from 0", self.path.display());
            return Ok(0);
        }
        let record = HighScoreRecord::load_from_file(&self.path)?;
        Ok(record.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<(), HighScoreError> {
        let last_updated = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        HighScoreRecord {
            high_score,
            last_updated,
        }
        .save_to_file(&self.path)?;
        log::debug!("High score {high_score} saved to {}", self.path.display());
        Ok(())
    }
}

/// High score kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    high_score: u32,
    saves: usize,
    read_only: bool,
}

impl MemoryHighScoreStore {
    /// Store that starts with the given high score
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score,
            ..Self::default()
        }
    }

    /// Store whose writes always fail
    pub fn read_only(high_score: u32) -> Self {
        Self {
            high_score,
            saves: 0,
            read_only: true,
        }
    }

    /// Last saved value
    pub const fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Number of successful saves
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<u32, HighScoreError> {
        Ok(self.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<(), HighScoreError> {
        if self.read_only {
            return Err(HighScoreError::Unavailable("read-only store".to_string()));
        }
        self.high_score = high_score;
        self.saves += 1;
        Ok(())
    }
}
