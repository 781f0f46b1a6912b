//! crates/quiz_core/src/settings.rs
//!
//! Persists the user's `QuizConfig` as a JSON blob.

use crate::domain::QuizConfig;
use crate::ports::{KeyValueStore, PortError, PortResult};
use std::sync::Arc;
use tracing::warn;

pub const SETTINGS_KEY: &str = "quiz_settings_v1";

#[derive(Clone)]
pub struct SettingsStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Returns the persisted configuration, or the default when nothing usable is stored.
    pub async fn load(&self) -> QuizConfig {
        match self.try_load().await {
            Ok(Some(config)) => config,
            Ok(None) => QuizConfig::default(),
            Err(e) => {
                warn!("Ignoring unreadable settings: {}", e);
                QuizConfig::default()
            }
        }
    }

    async fn try_load(&self) -> PortResult<Option<QuizConfig>> {
        let Some(raw) = self.kv.get(SETTINGS_KEY).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| PortError::StorageCorruption(e.to_string()))
    }

    pub async fn save(&self, config: &QuizConfig) -> PortResult<()> {
        let raw = serde_json::to_string(config).map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.kv.set(SETTINGS_KEY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DifficultyFilter, SourceKind};
    use crate::memory::InMemoryStore;

    fn store() -> (SettingsStore, Arc<InMemoryStore>) {
        let kv = Arc::new(InMemoryStore::new());
        (SettingsStore::new(kv.clone()), kv)
    }

    #[tokio::test]
    async fn missing_settings_load_as_default() {
        let (settings, _) = store();
        let config = settings.load().await;
        assert_eq!(config, QuizConfig::default());
        assert_eq!(config.source, SourceKind::Remote);
        assert_eq!(config.question_count, 10);
        assert_eq!(config.difficulty, DifficultyFilter::Any);
        assert_eq!(config.timer_secs, 30);
    }

    #[tokio::test]
    async fn save_then_load_round_trips_every_valid_config() {
        let (settings, _) = store();
        for source in [SourceKind::Remote, SourceKind::Local] {
            for difficulty in [
                DifficultyFilter::Any,
                DifficultyFilter::Easy,
                DifficultyFilter::Medium,
                DifficultyFilter::Hard,
            ] {
                for question_count in 5..=10 {
                    for timer_secs in [10, 30, 77, 120] {
                        let config = QuizConfig {
                            source,
                            question_count,
                            difficulty,
                            timer_secs,
                        };
                        settings.save(&config).await.unwrap();
                        assert_eq!(settings.load().await, config);
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn corrupt_blob_is_swallowed() {
        let (settings, kv) = store();
        kv.set(SETTINGS_KEY, "{not json").await.unwrap();
        assert_eq!(settings.load().await, QuizConfig::default());

        kv.set(SETTINGS_KEY, r#"{"source":"carrier-pigeon"}"#).await.unwrap();
        assert_eq!(settings.load().await, QuizConfig::default());
    }
}
