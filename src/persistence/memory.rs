use super::{ProgressError, ProgressStore};
use crate::progress::SavedProgress;

/// In-process store, for tests and hosts without storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Option<SavedProgress>,
    writes: usize,
}

impl MemoryStore {
    /// Number of successful saves so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<Option<SavedProgress>, ProgressError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, progress: &SavedProgress) -> Result<(), ProgressError> {
        self.saved = Some(progress.clone());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ProgressError> {
        self.saved = None;
        Ok(())
    }
}
