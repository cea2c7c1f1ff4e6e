//! Pause Switch Adapter

use crate::ports::PauseSwitch;
use std::sync::atomic::{AtomicBool, Ordering};

/// Lock-free pause flag.
#[derive(Default)]
pub struct AtomicPauseSwitch {
    paused: AtomicBool,
}

impl AtomicPauseSwitch {
    /// Unpaused switch.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PauseSwitch for AtomicPauseSwitch {
    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }
}
