//! Type aliases for shared state.
//!
//! The animator task, the status machine, and the orchestrator all touch the
//! same surface and status values, so they share them behind
//! `parking_lot::Mutex`.

use parking_lot::Mutex;
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for state shared with async tasks.
///
/// # Example
/// ```rust,ignore
/// let surface: ThreadSafe<RecordingSurface> = thread_safe(RecordingSurface::new(400, 300));
/// surface.lock().clear();
/// ```
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// Wrap a value in a [`ThreadSafe`] handle.
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}
