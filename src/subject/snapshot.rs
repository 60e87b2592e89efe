use std::sync::Arc;

use parking_lot::Mutex;

/// A swappable reference to an immutable value.
///
/// Readers take a clone of the current `Arc` and work on it without any lock
/// held. Writers build a complete replacement and publish it with
/// [`compare_and_swap`](SnapshotCell::compare_and_swap), retrying from a
/// fresh [`load`](SnapshotCell::load) when another writer got there first.
///
/// The lock only guards the pointer swap itself; it is never held while the
/// snapshot is read, built or dropped.
pub(crate) struct SnapshotCell<T>(Mutex<Arc<T>>);

impl<T> SnapshotCell<T> {
  pub(crate) fn new(value: T) -> Self { SnapshotCell(Mutex::new(Arc::new(value))) }

  #[inline]
  pub(crate) fn load(&self) -> Arc<T> { self.0.lock().clone() }

  /// Publishes `new` if the cell still holds `current`, otherwise hands
  /// `new` back so the caller can retry without rebuilding it.
  pub(crate) fn compare_and_swap(&self, current: &Arc<T>, new: Arc<T>) -> Result<(), Arc<T>> {
    let previous = {
      let mut slot = self.0.lock();
      if !Arc::ptr_eq(&slot, current) {
        return Err(new);
      }
      std::mem::replace(&mut *slot, new)
    };
    drop(previous);
    Ok(())
  }
}
