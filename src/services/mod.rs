pub mod memory;
pub mod users;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use memory::{MemoryService, SharedGame};
pub use users::{UserError, UserService};

/// Acquire a store lock. A panic in another holder cannot leave the stores in
/// a torn state (every mutation completes before the guard drops), so a
/// poisoned lock is recovered instead of propagated.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
