//! Survival-time leaderboard
//!
//! The shared board is a flat JSON blob on a remote key-value store:
//! `{"leaderboard": [{"name": "ABCD", "score": 42.3, "date": 1700000000000}]}`.
//! The host fetches and posts the blob; this module owns everything in
//! between. On wasm the last known board is also cached in LocalStorage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_LEADERBOARD_ENTRIES, MAX_NAME_LEN};
use crate::platform::storage;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("malformed leaderboard blob: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player initials
    pub name: String,
    /// Seconds survived, one decimal
    pub score: f64,
    /// Unix timestamp (ms) when achieved
    pub date: f64,
}

/// Wire shape of the remote blob. A missing or null board is empty.
#[derive(Debug, Default, Deserialize)]
struct Blob {
    #[serde(default)]
    leaderboard: Option<Vec<ScoreEntry>>,
}

/// Top survival times
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub scores: Vec<ScoreEntry>,
    /// Index of this session's latest submission, if it made the board
    #[serde(skip)]
    pub player_rank: Option<usize>,
}

impl Leaderboard {
    /// LocalStorage key (used only in wasm32)
    const STORAGE_KEY: &'static str = "sky_runner_leaderboard";

    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the remote blob. A missing `leaderboard` key is an empty board.
    pub fn from_blob(json: &str) -> Result<Self, LeaderboardError> {
        let blob: Blob = serde_json::from_str(json)?;
        let mut board = Self {
            scores: blob.leaderboard.unwrap_or_default(),
            player_rank: None,
        };
        board.sort();
        Ok(board)
    }

    /// Serialize to the remote blob shape
    pub fn to_blob(&self) -> String {
        #[derive(Serialize)]
        struct BlobRef<'a> {
            leaderboard: &'a [ScoreEntry],
        }
        serde_json::to_string(&BlobRef {
            leaderboard: &self.scores,
        })
        .unwrap_or_else(|_| r#"{"leaderboard":[]}"#.to_string())
    }

    /// Replace the scores with a freshly fetched board, keeping the player rank
    pub fn replace_scores(&mut self, fetched: Leaderboard) {
        self.scores = fetched.scores;
    }

    fn sort(&mut self) {
        self.scores
            .sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    /// Check if a survival time would make the top list
    pub fn qualifies(&self, score: f64) -> bool {
        if self.scores.len() < MAX_LEADERBOARD_ENTRIES {
            return true;
        }
        self.scores.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a score. Returns the 0-based rank, or `None` if it fell off the board.
    pub fn submit(&mut self, name: &str, score: f64, date: f64) -> Option<usize> {
        let entry = ScoreEntry {
            name: sanitize_name(name),
            score: round_tenths(score),
            date,
        };

        self.scores.push(entry.clone());
        self.sort();
        self.scores.truncate(MAX_LEADERBOARD_ENTRIES);

        self.player_rank = self.scores.iter().position(|s| *s == entry);
        self.player_rank
    }

    /// Forget the previous run's rank (new game)
    pub fn reset_player_rank(&mut self) {
        self.player_rank = None;
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<f64> {
        self.scores.first().map(|e| e.score)
    }

    /// Load the cached board from LocalStorage
    pub fn load_cached() -> Self {
        match storage::load_json::<Leaderboard>(Self::STORAGE_KEY) {
            Some(board) => {
                log::info!("Loaded {} cached leaderboard entries", board.scores.len());
                board
            }
            None => Self::new(),
        }
    }

    /// Cache the board in LocalStorage
    pub fn save_cached(&self) {
        if storage::save_json(Self::STORAGE_KEY, self) {
            log::info!("Leaderboard cached ({} entries)", self.scores.len());
        }
    }
}

/// Uppercase initials, letters only, at most four
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .take(MAX_NAME_LEN)
        .collect()
}

/// Round to one decimal place
pub fn round_tenths(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

/// Format a timestamp relative to `now` (both ms)
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 1000.0 / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
