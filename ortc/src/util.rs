use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a registry mutex. Registries hold plain data, so a panic while the
/// lock was held leaves nothing half-updated and the guard is recovered.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
