//! Clock Adapters

use crate::ports::ChainClock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Test clock with explicit time and block key.
#[derive(Default)]
pub struct ManualClock {
    now: AtomicU64,
    block: AtomicU64,
}

impl ManualClock {
    /// Clock at `now` in block `block_key`.
    pub fn new(now: u64, block_key: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
            block: AtomicU64::new(block_key),
        }
    }

    /// Jump to `now`.
    pub fn set_time(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move time forward.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    /// Jump to `block_key`.
    pub fn set_block(&self, block_key: u64) {
        self.block.store(block_key, Ordering::SeqCst);
    }

    /// Advance one block and return the new key.
    pub fn next_block(&self) -> u64 {
        self.block.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl ChainClock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn block_key(&self) -> u64 {
        self.block.load(Ordering::SeqCst)
    }
}

/// Wall clock. Block key is derived from a fixed block time.
pub struct SystemClock {
    block_time_secs: u64,
}

impl SystemClock {
    /// Clock producing one block every `block_time_secs` (min 1).
    pub fn new(block_time_secs: u64) -> Self {
        Self {
            block_time_secs: block_time_secs.max(1),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(12)
    }
}

impl ChainClock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn block_key(&self) -> u64 {
        self.now() / self.block_time_secs
    }
}
