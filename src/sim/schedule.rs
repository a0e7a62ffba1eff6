//! Timers for the cooperative timing domain
//!
//! Stage transitions are one-shot events tagged with the epoch that was
//! current when they were scheduled. Every (re)initialization advances the
//! epoch, so a transition scheduled against an earlier layout is dropped
//! when it comes due instead of re-initializing fresh state.

use serde::{Deserialize, Serialize};

use super::state::DeathCause;

/// Delayed stage change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Portal reached: move on to `stage`
    AdvanceStage { stage: u32 },
    /// Agent lost: fresh layout of `stage`
    Respawn { stage: u32, cause: DeathCause },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTransition {
    pub due_ms: f64,
    pub epoch: u64,
    pub transition: Transition,
}

/// One-shot transition queue keyed by epoch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    epoch: u64,
    pending: Vec<ScheduledTransition>,
}

impl Scheduler {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Invalidate everything scheduled so far
    pub fn advance_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Queue `transition` to fire at `due_ms` under the current epoch
    pub fn schedule(&mut self, due_ms: f64, transition: Transition) {
        self.pending.push(ScheduledTransition {
            due_ms,
            epoch: self.epoch,
            transition,
        });
    }

    pub fn pending(&self) -> &[ScheduledTransition] {
        &self.pending
    }

    /// Remove and return every entry due at `now_ms`, earliest first
    pub fn take_due(&mut self, now_ms: f64) -> Vec<ScheduledTransition> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due
    }

    /// Whether an entry still belongs to the live epoch
    pub fn is_current(&self, entry: &ScheduledTransition) -> bool {
        entry.epoch == self.epoch
    }
}

/// Fixed-period timer independent of the frame rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalTimer {
    pub period_ms: f64,
    pub next_due_ms: f64,
}

impl IntervalTimer {
    pub fn new(period_ms: f64, now_ms: f64) -> Self {
        Self {
            period_ms,
            next_due_ms: now_ms + period_ms,
        }
    }

    /// True once per elapsed period. A long stall fires once, not in a burst.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms += self.period_ms;
        if self.next_due_ms <= now_ms {
            self.next_due_ms = now_ms + self.period_ms;
        }
        true
    }
}
