//! Background scroll suppression while a modal is open.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Host hook that stops and restores background scrolling.
pub trait ScrollLock: Send + Sync {
    fn lock(&self);
    fn unlock(&self);
}

/// Holds the scroll lock for as long as it lives.
///
/// `unlock` runs exactly once, on drop, whichever way the owner goes away.
pub struct ScrollGuard {
    lock: Arc<dyn ScrollLock>,
}

impl ScrollGuard {
    pub fn acquire(lock: Arc<dyn ScrollLock>) -> Self {
        lock.lock();
        Self { lock }
    }
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}

impl core::fmt::Debug for ScrollGuard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ScrollGuard")
    }
}

/// Scroll lock for headless hosts: counts lock and unlock effects.
#[derive(Debug, Default)]
pub struct ScrollCounter {
    locks: AtomicUsize,
    unlocks: AtomicUsize,
}

impl ScrollCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locks(&self) -> usize {
        self.locks.load(Ordering::SeqCst)
    }

    pub fn unlocks(&self) -> usize {
        self.unlocks.load(Ordering::SeqCst)
    }

    pub fn is_locked(&self) -> bool {
        self.locks() > self.unlocks()
    }
}

impl ScrollLock for ScrollCounter {
    fn lock(&self) {
        self.locks.fetch_add(1, Ordering::SeqCst);
    }

    fn unlock(&self) {
        self.unlocks.fetch_add(1, Ordering::SeqCst);
    }
}
