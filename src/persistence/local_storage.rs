//! Browser LocalStorage store (WASM only)

use super::{ProgressError, ProgressStore};
use crate::progress::SavedProgress;

/// Key shared with earlier releases of the game
const STORAGE_KEY: &str = "noiseGameState";

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, ProgressError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(ProgressError::Unavailable)
    }
}

impl ProgressStore for LocalStorageStore {
    fn load(&self) -> Result<Option<SavedProgress>, ProgressError> {
        let storage = Self::storage()?;
        match storage.get_item(STORAGE_KEY) {
            Ok(Some(json)) => Ok(Some(SavedProgress::from_json(&json)?)),
            Ok(None) => Ok(None),
            Err(_) => Err(ProgressError::Unavailable),
        }
    }

    fn save(&mut self, progress: &SavedProgress) -> Result<(), ProgressError> {
        let json = progress.to_json()?;
        Self::storage()?
            .set_item(STORAGE_KEY, &json)
            .map_err(|_| ProgressError::Unavailable)?;
        log::info!("Progress saved (stage {})", progress.stage);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ProgressError> {
        Self::storage()?
            .remove_item(STORAGE_KEY)
            .map_err(|_| ProgressError::Unavailable)
    }
}
