//! Storage backends for saved progress
//!
//! The simulation never touches storage; hosts drain its events and hand
//! them to [`sync_events`], which updates the in-memory record and writes
//! it through a [`ProgressStore`].

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
mod local_storage;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use crate::progress::SavedProgress;
use crate::sim::GameEvent;

/// Storage failures
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("progress storage is unavailable")]
    Unavailable,
    #[error("progress storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("saved progress is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Somewhere a [`SavedProgress`] can live between launches
pub trait ProgressStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<SavedProgress>, ProgressError>;
    fn save(&mut self, progress: &SavedProgress) -> Result<(), ProgressError>;
    fn clear(&mut self) -> Result<(), ProgressError>;
}

/// Load saved progress, falling back to a fresh start on any failure
pub fn load_or_default(store: &dyn ProgressStore) -> SavedProgress {
    match store.load() {
        Ok(Some(progress)) => {
            log::info!(
                "Loaded progress: stage {}, record {:.0}",
                progress.stage,
                progress.record_x
            );
            progress
        }
        Ok(None) => {
            log::info!("No saved progress, starting fresh");
            SavedProgress::default()
        }
        Err(err) => {
            log::warn!("Ignoring saved progress: {err}");
            SavedProgress::default()
        }
    }
}

/// Apply drained simulation events and persist the result if it changed
pub fn sync_events(
    store: &mut dyn ProgressStore,
    progress: &mut SavedProgress,
    events: &[GameEvent],
) -> Result<(), ProgressError> {
    let mut dirty = false;
    for event in events {
        if matches!(event, GameEvent::ProgressReset) {
            store.clear()?;
        }
        dirty |= progress.apply_event(event);
    }
    if dirty {
        store.save(progress)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl ProgressStore for BrokenStore {
        fn load(&self) -> Result<Option<SavedProgress>, ProgressError> {
            Err(ProgressError::Unavailable)
        }
        fn save(&mut self, _: &SavedProgress) -> Result<(), ProgressError> {
            Err(ProgressError::Unavailable)
        }
        fn clear(&mut self) -> Result<(), ProgressError> {
            Err(ProgressError::Unavailable)
        }
    }

    #[test]
    fn test_load_falls_back_on_error() {
        assert_eq!(load_or_default(&BrokenStore), SavedProgress::default());
    }

    #[test]
    fn test_sync_saves_only_on_change() {
        let mut store = MemoryStore::default();
        let mut progress = SavedProgress::default();

        sync_events(
            &mut store,
            &mut progress,
            &[GameEvent::StageStarted { stage: 1, seed: 3 }],
        )
        .unwrap();
        assert_eq!(store.writes(), 0);

        sync_events(
            &mut store,
            &mut progress,
            &[GameEvent::StageCleared {
                stage: 1,
                highest_stage: 2,
            }],
        )
        .unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.load().unwrap().unwrap().stage, 2);
    }

    #[test]
    fn test_reset_clears_store() {
        let mut store = MemoryStore::default();
        let mut progress = SavedProgress {
            stage: 7,
            record_x: 100.0,
        };
        store.save(&progress).unwrap();
        sync_events(&mut store, &mut progress, &[GameEvent::ProgressReset]).unwrap();
        assert_eq!(progress, SavedProgress::default());
        assert_eq!(store.load().unwrap(), Some(SavedProgress::default()));
    }

    #[test]
    fn test_sync_propagates_errors() {
        let mut progress = SavedProgress::default();
        let result = sync_events(
            &mut BrokenStore,
            &mut progress,
            &[GameEvent::RecordChanged { record_x: 10.0 }],
        );
        assert!(matches!(result, Err(ProgressError::Unavailable)));
    }
}
