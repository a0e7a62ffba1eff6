//! Saved progress
//!
//! One small record: the highest stage unlocked (chosen as the starting
//! stage on the next launch) and the farthest x ever reached. The JSON
//! layout is `{"stage": 4, "record": 5120.5}`.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

fn first_stage() -> u32 {
    1
}

/// Persisted progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProgress {
    /// Highest unlocked stage
    #[serde(default = "first_stage")]
    pub stage: u32,
    /// Farthest x reached
    #[serde(default, rename = "record")]
    pub record_x: f32,
}

impl Default for SavedProgress {
    fn default() -> Self {
        Self {
            stage: 1,
            record_x: 0.0,
        }
    }
}

impl SavedProgress {
    /// Fold a simulation event in. Returns true if the record changed and
    /// should be written back.
    pub fn apply_event(&mut self, event: &GameEvent) -> bool {
        match *event {
            GameEvent::StageCleared { highest_stage, .. } if highest_stage > self.stage => {
                self.stage = highest_stage;
                true
            }
            GameEvent::RecordChanged { record_x } if record_x > self.record_x => {
                self.record_x = record_x;
                true
            }
            GameEvent::ProgressReset => {
                *self = Self::default();
                true
            }
            _ => false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut progress: Self = serde_json::from_str(json)?;
        progress.stage = progress.stage.max(1);
        Ok(progress)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
