//! Persistent top-N high-score list.
//!
//! The store is a plain text file, one `"<name> <score>"` line per entry,
//! sorted best first.  It is read once at startup and rewritten in full
//! whenever an entry is accepted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::entities::HighScoreEntry;
use crate::error::LedgerError;

pub const NEW_RECORD_PROMPT: &str = "New record! Enter your name:";

/// Supplies a player name on request.  `None` means the player cancelled.
pub trait NamePrompt {
    fn prompt(&mut self, message: &str) -> Option<String>;
}

impl<F> NamePrompt for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn prompt(&mut self, message: &str) -> Option<String> {
        (self)(message)
    }
}

/// Clean a raw player name.
///
/// Whitespace becomes a plain space, then anything that is not an ASCII
/// letter, digit, `_` or space is dropped (accented vowels included).
/// Returns `None` when nothing is left after trimming.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|&c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Score as stored and shown: whole values keep one decimal (`10.0`).
pub fn format_score(score: f32) -> String {
    if score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        score.to_string()
    }
}

/// Serialise entries in store format, one line each.
pub fn render_entries(entries: &[HighScoreEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} {}\n", e.name, format_score(e.score)))
        .collect()
}

/// Parse store contents.  Blank lines are skipped; the score is whatever
/// follows the last space, so names may contain spaces.
pub fn parse_entries(text: &str) -> Result<Vec<HighScoreEntry>, LedgerError> {
    let mut entries = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        let malformed = || LedgerError::Parse {
            line: i + 1,
            content: line.to_string(),
        };
        let (name, score) = line.rsplit_once(' ').ok_or_else(malformed)?;
        let score: f32 = score.parse().map_err(|_| malformed())?;
        if name.trim().is_empty() || !score.is_finite() {
            return Err(malformed());
        }
        entries.push(HighScoreEntry {
            name: name.trim().to_string(),
            score,
        });
    }
    Ok(entries)
}

/// Best first; `sort_by` is stable so equal scores keep insertion order.
fn rank(entries: &mut Vec<HighScoreEntry>, capacity: usize) {
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    entries.truncate(capacity);
}

#[derive(Debug, Clone)]
pub struct Ledger {
    entries: Vec<HighScoreEntry>,
    capacity: usize,
    /// `None` keeps the ledger in memory only.
    path: Option<PathBuf>,
}

impl Ledger {
    /// An empty ledger that is never written to disk.
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            path: None,
        }
    }

    /// Load the ledger stored at `path`.  A missing, unreadable or corrupt
    /// file yields an empty history; later saves still go to `path`.
    pub fn load_from(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let mut entries = match read_store(&path) {
            Ok(entries) => {
                info!("loaded {} high score(s) from {}", entries.len(), path.display());
                entries
            }
            Err(LedgerError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!("no score file at {}, starting fresh", path.display());
                Vec::new()
            }
            Err(e) => {
                warn!("ignoring score file {}: {}", path.display(), e);
                Vec::new()
            }
        };
        rank(&mut entries, capacity);
        Self {
            entries,
            capacity,
            path: Some(path),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// True when `score` would earn a place: the list has room, or the
    /// score beats at least one entry.
    pub fn qualifies(&self, score: f32) -> bool {
        self.entries.len() < self.capacity || self.entries.iter().any(|e| score > e.score)
    }

    /// Ask `prompt` for a name if `score` qualifies and record it.
    /// Returns whether an entry was added.
    pub fn record_candidate(&mut self, score: f32, prompt: &mut impl NamePrompt) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        let raw = prompt.prompt(NEW_RECORD_PROMPT);
        self.submit(raw.as_deref(), score)
    }

    /// Record `score` under `raw_name` (`None` = cancelled).  Rejected
    /// when the score does not qualify or the name sanitises to nothing;
    /// a rejected candidate leaves the ledger untouched.
    ///
    /// A failed save is logged and otherwise ignored; the in-memory list
    /// still holds the new entry and the next save rewrites everything.
    pub fn submit(&mut self, raw_name: Option<&str>, score: f32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        let Some(name) = raw_name.and_then(sanitize_name) else {
            info!("high score {} discarded: no usable name", score);
            return false;
        };

        info!("new high score: {} {}", name, score);
        self.entries.push(HighScoreEntry { name, score });
        rank(&mut self.entries, self.capacity);

        if let Err(e) = self.save() {
            warn!("could not save high scores: {}", e);
        }
        true
    }

    /// Overwrite the store with the full list.  No-op for in-memory ledgers.
    pub fn save(&self) -> Result<(), LedgerError> {
        match &self.path {
            Some(path) => write_store(path, &self.entries),
            None => Ok(()),
        }
    }
}

pub fn read_store(path: &Path) -> Result<Vec<HighScoreEntry>, LedgerError> {
    let text = fs::read_to_string(path)?;
    parse_entries(&text)
}

pub fn write_store(path: &Path, entries: &[HighScoreEntry]) -> Result<(), LedgerError> {
    fs::write(path, render_entries(entries))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_scores_keep_one_decimal() {
        assert_eq!(format_score(10.0), "10.0");
        assert_eq!(format_score(12.5), "12.5");
        assert_eq!(format_score(0.0), "0.0");
    }

    #[test]
    fn rank_is_stable_on_ties() {
        let mut entries = vec![
            HighScoreEntry { name: "first".into(), score: 5.0 },
            HighScoreEntry { name: "top".into(), score: 9.0 },
            HighScoreEntry { name: "second".into(), score: 5.0 },
        ];
        rank(&mut entries, 5);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["top", "first", "second"]);
    }
}
