//! Process-wide, lazily initialized resources (loaded models, scaler artifacts).
use std::sync::{Arc, Mutex, MutexGuard};

/// A slot that is filled on first use and shared read-only afterwards.
///
/// Initialization runs under the slot's lock, so concurrent first callers initialize once and
/// all receive the same `Arc`. [`LazyResource::reset`] empties the slot so the next caller loads
/// again.
#[derive(Debug)]
pub struct LazyResource<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> Default for LazyResource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LazyResource<T> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<T>>> {
        // the slot is only written after init succeeds
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_or_try_init<E, F>(&self, init: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut slot = self.lock();
        if let Some(value) = slot.as_ref() {
            return Ok(Arc::clone(value));
        }
        let value = Arc::new(init()?);
        *slot = Some(Arc::clone(&value));
        Ok(value)
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.lock().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().is_some()
    }

    /// Drop the cached value. Holders of an existing `Arc` keep theirs.
    pub fn reset(&self) {
        self.lock().take();
    }
}
