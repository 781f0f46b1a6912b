//! crates/quiz_core/src/high_scores.rs
//!
//! The capped, sorted leaderboard.

use crate::domain::HighScoreEntry;
use crate::ports::{KeyValueStore, PortError, PortResult};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

pub const HIGH_SCORES_KEY: &str = "quiz_highscores_v1";
pub const HIGH_SCORE_CAP: usize = 20;

/// Best percentage first; equal percentages keep the older entry first.
pub fn compare_entries(a: &HighScoreEntry, b: &HighScoreEntry) -> Ordering {
    b.percent_correct
        .total_cmp(&a.percent_correct)
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

#[derive(Clone)]
pub struct HighScoreStore {
    kv: Arc<dyn KeyValueStore>,
    /// Serialises the load, sort and write of `append` across sessions.
    write_lock: Arc<Mutex<()>>,
}

impl HighScoreStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the persisted leaderboard, or an empty one when nothing usable is stored.
    pub async fn load_all(&self) -> Vec<HighScoreEntry> {
        match self.try_load_all().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring unreadable high scores: {}", e);
                Vec::new()
            }
        }
    }

    /// Absent or corrupt data reads as an empty board; a failing store is an error.
    async fn try_load_all(&self) -> PortResult<Vec<HighScoreEntry>> {
        let Some(raw) = self.kv.get(HIGH_SCORES_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Ignoring corrupt high scores: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Inserts `entry`, re-sorts, keeps the top 20, persists and returns the result.
    pub async fn append(&self, entry: HighScoreEntry) -> PortResult<Vec<HighScoreEntry>> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.try_load_all().await?;
        entries.push(entry);
        entries.sort_by(compare_entries);
        entries.truncate(HIGH_SCORE_CAP);

        let raw = serde_json::to_string(&entries).map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.kv.set(HIGH_SCORES_KEY, &raw).await?;
        Ok(entries)
    }

    pub async fn clear(&self) -> PortResult<()> {
        self.kv.remove(HIGH_SCORES_KEY).await
    }
}
