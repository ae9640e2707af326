// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Shared Engine Handle
// ─────────────────────────────────────────────────────────────────────
//! Cloneable handle for driving one engine from several threads.
//!
//! Each call takes the lock for its whole duration, so a `step` is
//! observed atomically by every other handle.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use fusion_types::{Signal, Stimuli, UnitId, UnitStatus};

use crate::system::FusionSystem;

/// Thread-safe: engine access is guarded by a `parking_lot::Mutex`.
pub struct SharedEngine<E: FusionSystem> {
    inner: Arc<Mutex<E>>,
}

impl<E: FusionSystem> Clone for SharedEngine<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: FusionSystem> SharedEngine<E> {
    pub fn new(engine: E) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn step(&self, stimuli: &Stimuli) -> Signal {
        self.inner.lock().step(stimuli)
    }

    pub fn status(&self) -> BTreeMap<UnitId, UnitStatus> {
        self.inner.lock().get_status()
    }

    pub fn recover(&self) {
        self.inner.lock().recover();
    }

    pub fn is_scheduled(&self) -> bool {
        self.inner.lock().is_scheduled()
    }

    pub fn scheduled_count(&self) -> u64 {
        self.inner.lock().scheduled_count()
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
