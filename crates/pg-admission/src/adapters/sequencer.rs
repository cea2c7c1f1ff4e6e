//! Sequencer Feed Adapter

use crate::domain::{AdmissionError, SequencerStatus};
use crate::ports::SequencerFeed;
use parking_lot::RwLock;

/// Settable sequencer uptime feed.
pub struct StaticSequencerFeed {
    status: RwLock<SequencerStatus>,
}

impl StaticSequencerFeed {
    /// Feed reporting `is_up` since `started_at`.
    pub fn new(is_up: bool, started_at: u64) -> Self {
        Self {
            status: RwLock::new(SequencerStatus { is_up, started_at }),
        }
    }

    /// Report a status change.
    pub fn set_status(&self, is_up: bool, started_at: u64) {
        *self.status.write() = SequencerStatus { is_up, started_at };
    }
}

impl SequencerFeed for StaticSequencerFeed {
    fn status(&self) -> Result<SequencerStatus, AdmissionError> {
        Ok(*self.status.read())
    }
}
