//! Bounded, persisted high-score table

use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Number of scores kept unless configured otherwise
pub const DEFAULT_CAPACITY: usize = 10;

/// Descending list of the best observed rates, bounded at a fixed capacity.
///
/// Persisted as plain text, one two-decimal score per line. Mutation goes
/// through [`Leaderboard::try_insert`] only, so the list is always sorted and
/// never longer than its capacity.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<f64>,
    capacity: usize,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Parse persisted scores, skipping lines that are not finite numbers.
    pub fn from_lines(contents: &str, capacity: usize) -> Self {
        let mut entries: Vec<f64> = contents
            .lines()
            .filter_map(|line| line.trim().parse::<f64>().ok())
            .filter(|score| score.is_finite())
            .collect();
        entries.sort_by(|a, b| b.total_cmp(a));
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    /// Load persisted scores.
    ///
    /// A missing file is a valid empty board; an unreadable one is logged
    /// and also yields an empty board rather than an error.
    pub fn load_from(path: &Path, capacity: usize) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_lines(&contents, capacity),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no high score file at {}", path.display());
                Self::new(capacity)
            }
            Err(err) => {
                warn!("failed to read high scores from {}: {err}", path.display());
                Self::new(capacity)
            }
        }
    }

    /// Serialize all entries, one two-decimal score per line.
    pub fn to_lines(&self) -> String {
        self.entries
            .iter()
            .map(|score| format!("{score:.2}\n"))
            .collect()
    }

    /// Write all entries to `path`, replacing prior contents.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_lines())
    }

    /// Offer a new score.
    ///
    /// Accepted when the board is under capacity or the score strictly beats
    /// the current minimum; a tie with the minimum at capacity is rejected.
    /// On acceptance the board is re-sorted descending and truncated back to
    /// capacity. Returns whether the score entered the board.
    pub fn try_insert(&mut self, score: f64) -> bool {
        let accepted = self.entries.len() < self.capacity
            || self.entries.last().is_some_and(|&min| score > min);
        if !accepted {
            return false;
        }
        self.entries.push(score);
        self.entries.sort_by(|a, b| b.total_cmp(a));
        self.entries.truncate(self.capacity);
        true
    }

    pub fn entries(&self) -> &[f64] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Resolve the high-score file location under the platform data directory,
/// falling back to the working directory when none is available. Never
/// fails: a board that cannot be persisted still works in memory.
pub fn store_path(file_name: &str) -> PathBuf {
    let Some(data_dir) = dirs::data_dir() else {
        warn!("no data directory available, keeping high scores in the working directory");
        return PathBuf::from(file_name);
    };
    let app_dir = data_dir.join("tapspeed");
    if let Err(err) = fs::create_dir_all(&app_dir) {
        warn!("failed to create {}: {err}", app_dir.display());
        return PathBuf::from(file_name);
    }
    app_dir.join(file_name)
}
